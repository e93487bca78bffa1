/// The name of the field attribute that carries decoding hints, e.g. `#[rest = "required"]`.
pub const METADATA_TAG: &str = "rest";

/// The token that marks a field as mandatory.
const REQUIRED_TOKEN: &str = "required";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-field decoding hints.
///
/// They are derived from a tiny tag language: a comma-separated list of tokens.
///
/// - `required` marks the field as mandatory;
/// - any other token overrides the name used to look the field up.
///
/// ```rust
/// use restbind::descriptor::FieldMetadata;
///
/// let metadata = FieldMetadata::parse("required,home_id");
/// assert!(metadata.required);
/// assert_eq!(metadata.override_name.as_deref(), Some("home_id"));
/// ```
pub struct FieldMetadata {
    /// Fail the decoding if no value can be found for this field.
    pub required: bool,
    /// Look the field up under this name rather than its lower-cased declared name.
    pub override_name: Option<String>,
}

impl FieldMetadata {
    /// Parse a tag into [`FieldMetadata`].
    ///
    /// An empty tag yields the default metadata: optional, no override.
    /// If more than one name token is provided, the last one wins.
    pub fn parse(tag: &str) -> Self {
        let mut metadata = Self::default();
        for token in tag.split(',') {
            match token {
                "" => continue,
                REQUIRED_TOKEN => metadata.required = true,
                name => metadata.override_name = Some(name.to_owned()),
            }
        }
        metadata
    }

    /// Metadata for a mandatory field, without a name override.
    pub fn required() -> Self {
        Self {
            required: true,
            override_name: None,
        }
    }

    /// Override the lookup name.
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.override_name = Some(name.into());
        self
    }
}
