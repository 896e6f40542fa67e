//! Pure string transforms between descriptor, companion and identifier forms.
//!
//! Every transform is anchored at the end of the path (or, for identifiers, at a whole
//! directory segment) so directory names that merely contain one of the tokens are never
//! rewritten. None of these helpers touch the filesystem.

mod identifier;
mod suffix;

pub use identifier::final_identifier;
pub use suffix::{
  alternate_for_companion, companion_for_descriptor, descriptor_for_companion, replace_suffix,
};
