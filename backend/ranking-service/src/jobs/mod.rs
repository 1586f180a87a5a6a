// ============================================
// Background Jobs Module
// ============================================
//
// Offline runners around the ranking engine. The engine itself never does
// I/O; jobs load snapshots exported by the data store and print results.

pub mod rank_snapshot;

pub use rank_snapshot::{run_rank_snapshot_job, RankSnapshotJob, RankSnapshotOutput};
