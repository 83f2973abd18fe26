use crate::core_api::CoreError;

/// A decoded entity backed by a raw byte image.
///
/// Edits land on the decoded fields; `rebuild_from_parts` re-encodes them into
/// the raw bytes (recomputing any checksum), `rebuild_from_raw` re-decodes the
/// fields after the raw bytes were replaced. Neither direction runs implicitly.
pub trait Record {
    fn raw(&self) -> &[u8];

    fn rebuild_from_parts(&mut self);

    fn rebuild_from_raw(&mut self) -> Result<(), CoreError>;
}
