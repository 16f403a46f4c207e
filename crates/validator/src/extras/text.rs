/// Whether the text has anything other than whitespace in it.
#[must_use]
pub fn is_filled(text: &str) -> bool {
  !text.trim().is_empty()
}

/// Appends `message` to the builder if `text` is missing or blank.
pub fn require_text(text: Option<&str>, message: &'static str, builder: &mut crate::MessageBuilder) {
  if !text.is_some_and(is_filled) {
    builder.insert(message);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ValidateError;

  #[test]
  fn test_is_filled() {
    assert!(is_filled("hello"));
    assert!(is_filled("  a  "));
    assert!(!is_filled(""));
    assert!(!is_filled(" \n\t "));
  }

  #[test]
  fn test_require_text() {
    let mut msg = ValidateError::msg_builder();
    require_text(Some("title"), "required", &mut msg);
    assert!(msg.build().is_empty());

    let mut msg = ValidateError::msg_builder();
    require_text(None, "required", &mut msg);
    require_text(Some("   "), "blank", &mut msg);
    assert_eq!(
      ValidateError::Messages(vec!["required".into(), "blank".into()]),
      msg.build()
    );
  }
}
