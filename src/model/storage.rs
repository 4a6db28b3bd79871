use serde::{Deserialize, Serialize};

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Access control applied to objects written to a storage area.
 */
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectAcl {
    PublicRead,
    Private,
}

/**
 * A logically separate object storage area.
 */
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StorageArea {
    /**
     * Key prefix of the area inside the bucket.
     */
    pub location: String,
    /**
     * Default access control for new objects.
     */
    pub default_acl: ObjectAcl,
    /**
     * Whether an existing object may be replaced.
     */
    pub file_overwrite: bool,
}

impl StorageArea {
    /**
     * Publicly readable static assets that may be overwritten on redeploy.
     */
    pub fn static_assets() -> Self {
        StorageArea { location: "static".to_string(), default_acl: ObjectAcl::PublicRead, file_overwrite: true }
    }

    /**
     * Private user uploads that are never overwritten.
     */
    pub fn media() -> Self {
        StorageArea { location: "media".to_string(), default_acl: ObjectAcl::Private, file_overwrite: false }
    }

    fn prefix(&self) -> &str {
        self.location.trim_matches('/')
    }
}

/**
 * The two storage areas used by the laboratory.
 */
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub bucket: String,
    #[serde(default = "StorageArea::static_assets")]
    pub static_area: StorageArea,
    #[serde(default = "StorageArea::media")]
    pub media_area: StorageArea,
}

impl StorageConfig {
    /**
     * Checks that both locations are plain relative prefixes and that neither area contains the other.
     */
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let static_prefix = self.static_area.prefix();
        let media_prefix = self.media_area.prefix();
        for prefix in [static_prefix, media_prefix] {
            if !is_relative_path(prefix) {
                return Err(ApplicationError::new(ErrorType::Initialization, format!("Invalid storage location: {prefix}")));
            }
        }
        let nested = |outer: &str, inner: &str| inner == outer || inner.starts_with(&format!("{outer}/"));
        if nested(static_prefix, media_prefix) || nested(media_prefix, static_prefix) {
            return Err(ApplicationError::new(ErrorType::Initialization, format!("Storage areas {static_prefix} and {media_prefix} overlap")));
        }
        Ok(())
    }
}

fn is_relative_path(path: &str) -> bool {
    !path.is_empty() && path.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_rejects_overlapping_areas() {
        let mut config = StorageConfig { bucket: "honey-lab".to_string(), static_area: StorageArea::static_assets(), media_area: StorageArea::media() };
        assert!(config.validate().is_ok());
        config.media_area.location = "static/uploads".to_string();
        assert_eq!(config.validate().unwrap_err().error_type, ErrorType::Initialization);
        config.media_area.location = "../media".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_from_toml() {
        let config: StorageConfig = toml::from_str("bucket = \"honey-lab\"").unwrap();
        assert_eq!(config.static_area.default_acl, ObjectAcl::PublicRead);
        assert!(config.static_area.file_overwrite);
        assert_eq!(config.media_area.default_acl, ObjectAcl::Private);
        assert!(!config.media_area.file_overwrite);
    }
}
