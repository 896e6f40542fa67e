use std::path::Path;

use crate::project::MaterialLayout;

/// Extract the identifier of a descriptor, rooted at the marker directory.
///
/// The marker must be a whole directory segment (preceded and followed by a separator) and
/// is compared ASCII case-insensitively. Both `/` and `\` count as separators so Windows
/// paths are handled on every host. The returned slice starts at the marker segment and
/// keeps the original separators and casing. Descriptors without the marker yield `None`.
pub fn final_identifier(layout: &MaterialLayout, descriptor: &Path) -> Option<String> {
  let value = descriptor.to_str()?;
  marker_tail(value, layout.marker_segment).map(str::to_string)
}

fn marker_tail<'a>(value: &'a str, marker: &str) -> Option<&'a str> {
  if marker.is_empty() {
    return None;
  }

  let separators: Vec<usize> = value
    .char_indices()
    .filter(|(_, ch)| is_separator(*ch))
    .map(|(index, _)| index)
    .collect();

  separators.windows(2).find_map(|pair| {
    let start = pair[0] + 1;
    let segment = &value[start..pair[1]];
    segment
      .eq_ignore_ascii_case(marker)
      .then(|| &value[start..])
  })
}

fn is_separator(ch: char) -> bool {
  ch == '/' || ch == '\\'
}

#[cfg(test)]
mod tests {
  use super::*;

  fn identifier(raw: &str) -> Option<String> {
    final_identifier(&MaterialLayout::default_layout(), Path::new(raw))
  }

  #[test]
  fn slices_from_marker_segment() {
    assert_eq!(
      identifier("/root/assets/materials/wood/base.vmat").as_deref(),
      Some("materials/wood/base.vmat")
    );
  }

  #[test]
  fn matches_marker_case_insensitively_and_keeps_casing() {
    assert_eq!(
      identifier("/root/Materials/Wood/Base.vmat").as_deref(),
      Some("Materials/Wood/Base.vmat")
    );
    assert_eq!(
      identifier("C:\\addon\\MATERIALS\\metal\\plate.vmat").as_deref(),
      Some("MATERIALS\\metal\\plate.vmat")
    );
  }

  #[test]
  fn uses_the_first_marker_occurrence() {
    assert_eq!(
      identifier("/a/materials/b/materials/c.vmat").as_deref(),
      Some("materials/b/materials/c.vmat")
    );
  }

  #[test]
  fn rejects_paths_without_marker_segment() {
    assert_eq!(identifier("/root/other/wood/base.vmat"), None);
  }

  #[test]
  fn rejects_marker_embedded_in_other_names() {
    assert_eq!(identifier("/root/nonmaterialsfile.vmat"), None);
    assert_eq!(identifier("/root/materials_old/base.vmat"), None);
    assert_eq!(identifier("/root/old_materials/base.vmat"), None);
  }

  #[test]
  fn rejects_marker_as_file_name_or_leading_segment() {
    assert_eq!(identifier("/root/wood/materials"), None);
    assert_eq!(identifier("materials/wood/base.vmat"), None);
  }

  #[test]
  fn honours_custom_marker() {
    let layout = MaterialLayout {
      marker_segment: "mats",
      ..MaterialLayout::default_layout()
    };
    assert_eq!(
      final_identifier(&layout, Path::new("/x/MATS/y.vmat")).as_deref(),
      Some("MATS/y.vmat")
    );
    assert_eq!(final_identifier(&layout, Path::new("/x/materials/y.vmat")), None);
  }
}
