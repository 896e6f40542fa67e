//! Stage wrappers around the pure path transforms.

use std::path::PathBuf;

use crate::material_paths::{companion_for_descriptor, descriptor_for_companion, final_identifier};
use crate::models::IdentifierReport;
use crate::project::MaterialLayout;

/// Derive one companion path per descriptor, index for index.
pub fn derive_companions(layout: &MaterialLayout, descriptors: &[PathBuf]) -> Vec<PathBuf> {
    descriptors
        .iter()
        .map(|descriptor| companion_for_descriptor(layout, descriptor))
        .collect()
}

/// Map valid companions back to descriptors and extract their identifiers.
///
/// Companions whose descriptor has no marker segment are counted and skipped.
pub fn normalize_identifiers(layout: &MaterialLayout, valid_companions: &[PathBuf]) -> IdentifierReport {
    let mut report = IdentifierReport::default();

    for companion in valid_companions {
        let descriptor = descriptor_for_companion(layout, companion);
        match final_identifier(layout, &descriptor) {
            Some(identifier) => report.identifiers.push(identifier),
            None => {
                tracing::debug!(
                    descriptor = %descriptor.display(),
                    "no {} segment, dropping",
                    layout.marker_segment
                );
                report.dropped += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> MaterialLayout<'static> {
        MaterialLayout::default_layout()
    }

    #[test]
    fn derives_companions_with_matching_cardinality() {
        let descriptors = vec![
            PathBuf::from("/a/materials/one.vmat"),
            PathBuf::from("/a/other/two.vmat"),
        ];

        let companions = derive_companions(&layout(), &descriptors);

        assert_eq!(companions, vec![
            PathBuf::from("/a/materials/one_color.png"),
            PathBuf::from("/a/other/two_color.png"),
        ]);
    }

    #[test]
    fn drops_companions_without_marker() {
        let valid = vec![
            PathBuf::from("/root/assets/materials/wood/base_color.png"),
            PathBuf::from("/root/other/wood/base_color.png"),
            PathBuf::from("/root/assets/Materials/metal/plate_color.png"),
        ];

        let report = normalize_identifiers(&layout(), &valid);

        assert_eq!(report.identifiers, vec![
            "materials/wood/base.vmat".to_string(),
            "Materials/metal/plate.vmat".to_string(),
        ]);
        assert_eq!(report.dropped, 1);
    }
}
