//! Property tests for the coordinate codec.

use proptest::prelude::*;

use depot::Coordinates;

fn id_string() -> impl Strategy<Value = String> {
    // Group/artifact ids: dotted alphanumeric segments, no '/' or spaces.
    let segment = proptest::string::string_regex("[a-z][a-z0-9]{0,7}").unwrap();
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("."))
}

fn version_string() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9]{1,2}(\\.[0-9]{1,2}){0,2}(-SNAPSHOT)?").unwrap()
}

fn extension_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("jar".to_string()),
        Just("war".to_string()),
        Just("xml".to_string()),
        Just("zip".to_string()),
    ]
}

fn classifier_string() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::string::string_regex("[a-z]{1,10}").unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `parse(to_locator(c)) == c` for well-formed coordinates.
    #[test]
    fn property_locator_round_trips(
        group in id_string(),
        artifact in id_string(),
        version in version_string(),
        extension in extension_string(),
        classifier in classifier_string(),
    ) {
        let mut coords = Coordinates::new(group, artifact, version).with_extension(extension);
        if let Some(classifier) = classifier {
            coords = coords.with_classifier(classifier);
        }

        let locator = coords.to_locator();
        let parsed = Coordinates::parse(&locator).unwrap();
        prop_assert_eq!(parsed, coords);
    }

    /// PROPERTY: the storage path always ends with
    /// `<artifact>-<version>[-<classifier>].<extension>` and never contains
    /// a `..` component.
    #[test]
    fn property_path_shape(
        group in id_string(),
        artifact in id_string(),
        version in version_string(),
    ) {
        let coords = Coordinates::new(group, artifact.clone(), version.clone());
        let path = coords.to_path();

        let suffix = format!("{}-{}.jar", artifact, version);
        prop_assert!(path.ends_with(&suffix));
        prop_assert!(!path.split('/').any(|segment| segment == ".."));
        prop_assert!(!path.starts_with('/'));
    }
}
