use std::io::Write;

use vet::{Config, Convention, Error, Errors, FieldInfo, Validate, Validator, Walk};

#[derive(Walk)]
pub struct Inner {
    #[vet(json = "foo", yaml = "fooYaml")]
    pub foo: String,
    #[vet(form = "bar-form")]
    pub bar: String,
}

impl Validate for Inner {
    fn validate(&self) -> Result<(), Errors> {
        let errs = vet::append(Ok(()), vet::require_field("foo", &self.foo));
        vet::append(errs, vet::require_field("bar", &self.bar))
    }
}

#[derive(Walk)]
pub struct Outer {
    #[vet(json = "other_field")]
    pub other_field: Option<Box<Inner>>,
    #[vet(json = "others")]
    pub others: Vec<Inner>,
}

fn blank() -> Inner {
    Inner {
        foo: String::new(),
        bar: "x".to_string(),
    }
}

fn paths(result: Result<(), Errors>) -> Vec<String> {
    vet::errors(result).into_iter().map(|err| err.path).collect()
}

#[test]
fn custom_field_name_applies_to_every_segment() {
    let mut validator = Validator::new();
    validator.set_field_name(|info: &FieldInfo| format!("<{}>", info.name.to_uppercase()));

    let value = Outer {
        other_field: Some(Box::new(blank())),
        others: Vec::new(),
    };
    let got = vet::errors(validator.validate(&value));
    assert_eq!(got, vec![Error::field("<OTHER_FIELD>.<FOO>", "is required")]);
}

#[test]
fn custom_field_join_renders_brackets() {
    let validator = Validator::new().with_field_join(|path: &[String], field: &str| {
        let mut segments = path.to_vec();
        if !field.is_empty() {
            segments.push(field.to_string());
        }
        format!("[{}]", segments.join("]["))
    });

    let value = Outer {
        other_field: Some(Box::new(blank())),
        others: vec![blank()],
    };
    assert_eq!(
        paths(validator.validate(&value)),
        vec!["[other_field][foo]", "[others][0][foo]"]
    );
}

#[test]
fn empty_field_name_skips_the_subtree() {
    let validator = Validator::new().with_field_name(|info: &FieldInfo| {
        if info.name == "others" {
            String::new()
        } else {
            vet::naming::default_field_name(info)
        }
    });

    let value = Outer {
        other_field: Some(Box::new(blank())),
        others: vec![blank(), blank()],
    };
    assert_eq!(paths(validator.validate(&value)), vec!["other_field.foo"]);
}

#[test]
fn convention_order_changes_names() {
    let naming = vet::naming::by_conventions(vec![
        Convention::Yaml,
        Convention::Form,
        Convention::Json,
    ]);
    let validator = Validator::new().with_field_name(move |info: &FieldInfo| naming(info));

    let value = Inner {
        foo: String::new(),
        bar: String::new(),
    };
    assert_eq!(paths(validator.validate(&value)), vec!["fooYaml", "bar-form"]);
    assert_eq!(paths(vet::validate(&value)), vec!["foo", "bar-form"]);
}

#[test]
fn validator_from_config() {
    let mut cfg = Config::default();
    cfg.path.separator = "/".to_string();
    let validator = Validator::from_config(&cfg).expect("valid config");

    let value = Outer {
        other_field: None,
        others: vec![blank(), blank()],
    };
    assert_eq!(
        paths(validator.validate(&value)),
        vec!["others/0/foo", "others/1/foo"]
    );
}

#[test]
fn validator_from_invalid_config() {
    let mut cfg = Config::default();
    cfg.path.separator.clear();
    let err = Validator::from_config(&cfg).unwrap_err();
    assert_eq!(err.to_string(), "invalid config: path.separator: must not be empty");
}

#[test]
fn validator_from_loaded_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"[path]\nseparator = \"::\"\n\n[naming]\nconventions = [\"yaml\"]\n")
        .expect("write config");

    let cfg = vet::load_config(file.path()).expect("load config");
    let validator = Validator::from_config(&cfg).expect("valid config");
    let value = Outer {
        other_field: Some(Box::new(blank())),
        others: Vec::new(),
    };
    // No yaml tag on `other_field`, so the declared name is used.
    assert_eq!(paths(validator.validate(&value)), vec!["other_field::fooYaml"]);
}

#[test]
fn default_validator_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let value = Outer {
                    other_field: None,
                    others: (0..i).map(|_| blank()).collect(),
                };
                vet::errors(vet::validate(&value)).len()
            })
        })
        .collect();
    let counts: Vec<usize> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .collect();
    assert_eq!(counts, vec![0, 1, 2, 3]);
}
