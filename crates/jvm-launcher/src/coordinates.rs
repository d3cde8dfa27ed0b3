//! Parsing of OBR maven coordinates and test class locations

use crate::error::{Error, Result};

/// Maven coordinates of an OBR, parsed from `mvn:<group>/<artifact>/<version>/obr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenCoordinates {
    /// The maven group id
    pub group_id: String,
    /// The maven artifact id
    pub artifact_id: String,
    /// The artifact version
    pub version: String,
    /// The trailing classifier segment
    pub classifier: String,
}

/// The user passes the test to run as a single string. We split it up
/// into these useful chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestLocation {
    /// The OSGi bundle the test class is loaded from
    pub bundle_name: String,
    /// The fully-qualified java class name, without a `.class` suffix
    pub class_name: String,
}

const MVN_SCHEME: &str = "mvn:";
const OBR_CLASSIFIER: &str = "obr";

/// Parse and validate one OBR coordinate string.
pub fn validate_obr(obr: &str) -> Result<MavenCoordinates> {
    let remainder = obr
        .strip_prefix(MVN_SCHEME)
        .ok_or_else(|| Error::ObrMissingMvnPrefix {
            obr: obr.to_string(),
        })?;

    let parts: Vec<&str> = remainder.split('/').collect();
    if parts.len() != 4 {
        return Err(Error::ObrWrongPartCount {
            obr: obr.to_string(),
        });
    }
    if parts[3] != OBR_CLASSIFIER {
        return Err(Error::ObrBadSuffix {
            obr: obr.to_string(),
        });
    }

    Ok(MavenCoordinates {
        group_id: parts[0].to_string(),
        artifact_id: parts[1].to_string(),
        version: parts[2].to_string(),
        classifier: parts[3].to_string(),
    })
}

/// Parse and validate a list of OBR coordinate strings, failing on the
/// first malformed entry.
pub fn validate_obrs(obrs: &[String]) -> Result<Vec<MavenCoordinates>> {
    obrs.iter().map(|obr| validate_obr(obr)).collect()
}

/// User input is expected of the form `<bundle>/<qualified-class-name>`.
/// Split the two pieces apart to help validate them.
pub fn class_name_to_test_location(class_name_input: &str) -> Result<TestLocation> {
    let parts: Vec<&str> = class_name_input.split('/').collect();
    if parts.len() < 2 {
        return Err(Error::ClassNameMissingSlash {
            class: class_name_input.to_string(),
        });
    }
    if parts.len() > 2 {
        return Err(Error::ClassNameTooManySlashes {
            class: class_name_input.to_string(),
        });
    }
    if parts[1].ends_with(".class") {
        return Err(Error::ClassNameHasClassSuffix {
            class: class_name_input.to_string(),
        });
    }

    Ok(TestLocation {
        bundle_name: parts[0].to_string(),
        class_name: parts[1].to_string(),
    })
}

/// Check that a gherkin feature URL carries the required prefix and suffix.
pub fn validate_gherkin_url(url: &str) -> Result<()> {
    if !url.ends_with(".feature") {
        return Err(Error::GherkinUrlBadSuffix {
            url: url.to_string(),
        });
    }
    if !url.starts_with("file://") {
        return Err(Error::GherkinUrlBadPrefix {
            url: url.to_string(),
        });
    }
    Ok(())
}
