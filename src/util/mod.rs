/// Contains the [`Patch`] presence-tracking wrapper used by request records.
///
/// [`Patch`]: patch::Patch
pub mod patch;
