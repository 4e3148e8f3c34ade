use marker_trajectory_core::IntrinsicsError;

/// Errors surfaced by the tracking session.
///
/// Per-marker problems (no depth, malformed detections) never show up here;
/// they are absorbed inside [`crate::TrackingSession::update`].
#[derive(thiserror::Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    Intrinsics(#[from] IntrinsicsError),
    #[error("invalid tracker parameters: {0}")]
    InvalidParams(String),
}
