//! The fixed "select all fire hydrants" image set.

use std::collections::BTreeSet;

use redtape_common::CaptchaImage;

/// Nine tiles in display order, five of them hydrants
pub const CATALOG: [CaptchaImage; 9] = [
    CaptchaImage { id: 1, asset_ref: "hydrant-red", is_hydrant: true },
    CaptchaImage { id: 2, asset_ref: "crosswalk", is_hydrant: false },
    CaptchaImage { id: 3, asset_ref: "hydrant-yellow", is_hydrant: true },
    CaptchaImage { id: 4, asset_ref: "hydrant-rusty", is_hydrant: true },
    CaptchaImage { id: 5, asset_ref: "bicycle", is_hydrant: false },
    CaptchaImage { id: 6, asset_ref: "traffic-cone", is_hydrant: false },
    CaptchaImage { id: 7, asset_ref: "hydrant-snow", is_hydrant: true },
    CaptchaImage { id: 8, asset_ref: "mailbox", is_hydrant: false },
    CaptchaImage { id: 9, asset_ref: "hydrant-night", is_hydrant: true },
];

pub fn find(id: u8) -> Option<&'static CaptchaImage> {
    CATALOG.iter().find(|image| image.id == id)
}

/// Ids a submission must match exactly
pub fn hydrant_ids() -> BTreeSet<u8> {
    CATALOG
        .iter()
        .filter(|image| image.is_hydrant)
        .map(|image| image.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(CATALOG.len(), 9);
        assert_eq!(hydrant_ids().len(), 5);

        let ids: BTreeSet<u8> = CATALOG.iter().map(|image| image.id).collect();
        assert_eq!(ids.len(), 9, "ids must be unique");
    }

    #[test]
    fn test_find() {
        assert!(find(1).unwrap().is_hydrant);
        assert!(!find(2).unwrap().is_hydrant);
        assert!(find(0).is_none());
        assert!(find(10).is_none());
    }
}
