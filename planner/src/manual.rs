use shared::{GeoPoint, Slot};

use crate::{error::CoordinateError, parser::CoordinateParser, store::RouteEndpointStore};

/// Applies "Set Start" / "Set End" form submissions.
///
/// Unlike map clicks, the form names its slot explicitly, so `end` may be set
/// while `start` is still empty. A submission that fails to parse leaves the
/// store untouched; the error is handed back for the caller to drop or show.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualEntryReconciler {
    parser: CoordinateParser,
}

impl ManualEntryReconciler {
    pub fn new(parser: CoordinateParser) -> Self {
        Self { parser }
    }

    pub fn submit(
        &self,
        store: &mut RouteEndpointStore,
        slot: Slot,
        lat: &str,
        lon: &str,
    ) -> Result<GeoPoint, CoordinateError> {
        let point = self.parser.parse(lat, lon).inspect_err(|err| {
            tracing::debug!("manual {slot:?} entry ignored: {err}");
        })?;

        match slot {
            Slot::Start => store.set_start(point),
            Slot::End => store.set_end(point),
        }
        Ok(point)
    }
}
