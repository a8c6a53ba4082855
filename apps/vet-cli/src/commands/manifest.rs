use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use vet::{Error, Errors, Validate, Validator, Walk};

#[derive(Args)]
pub struct ManifestArgs {
    /// Manifest JSON file; the built-in sample is used when omitted
    pub file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Walk)]
pub struct Manifest {
    #[serde(default)]
    pub spec: Option<Box<Spec>>,
}

impl Validate for Manifest {
    fn validate(&self) -> Result<(), Errors> {
        if self.spec.is_none() {
            return Err(Error::field("spec", "is required").into());
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Walk)]
pub struct Spec {
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Validate for Spec {
    fn validate(&self) -> Result<(), Errors> {
        let mut errs = Ok(());

        if self.containers.is_empty() {
            errs = vet::append_field_error(errs, "containers", "must contain at least one item");
        } else {
            let names: HashSet<&str> = self
                .images
                .iter()
                .map(|image| image.name.as_str())
                .filter(|name| !name.is_empty())
                .collect();
            for (i, container) in self.containers.iter().enumerate() {
                if !container.image_ref.is_empty() && !names.contains(container.image_ref.as_str()) {
                    errs = vet::append(
                        errs,
                        Err(Error::field(
                            format!("containers.{i}.imageRef"),
                            format!("image with name '{}' not found", container.image_ref),
                        )),
                    );
                }
            }
        }

        if self.images.is_empty() {
            errs = vet::append_field_error(errs, "images", "must contain at least one item");
        }

        errs
    }
}

#[derive(Debug, Default, Deserialize, Walk)]
pub struct Container {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "imageRef")]
    pub image_ref: String,
}

impl Validate for Container {
    fn validate(&self) -> Result<(), Errors> {
        let errs = vet::append(Ok(()), vet::require_field("name", &self.name));
        vet::append(errs, vet::require_field("image_ref", &self.image_ref))
    }
}

#[derive(Debug, Default, Deserialize, Walk)]
pub struct Image {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub tag: String,
}

impl Validate for Image {
    fn validate(&self) -> Result<(), Errors> {
        let mut errs = vet::append(Ok(()), vet::require_field("name", &self.name));
        errs = vet::append(errs, vet::require_field("uri", &self.uri));
        vet::append(errs, vet::require_field("tag", &self.tag))
    }
}

/// Two containers, one referencing an undeclared image, and an incomplete image.
pub fn sample() -> Manifest {
    Manifest {
        spec: Some(Box::new(Spec {
            containers: vec![
                Container {
                    name: String::new(),
                    image_ref: "server".into(),
                },
                Container {
                    name: "worker".into(),
                    image_ref: "myServer".into(),
                },
            ],
            images: vec![Image {
                name: "server".into(),
                ..Image::default()
            }],
        })),
    }
}

fn load(args: &ManifestArgs) -> Result<Manifest> {
    let Some(path) = &args.file else {
        return Ok(sample());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing manifest JSON {}", path.display()))
}

pub fn run(validator: &Validator, args: ManifestArgs) -> Result<()> {
    let manifest = load(&args)?;
    let failures = super::report(validator.validate(&manifest));
    if failures > 0 {
        bail!("manifest has {failures} validation failure(s)");
    }
    println!("manifest is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(manifest: &Manifest) -> Vec<String> {
        vet::errors(vet::validate(manifest))
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn sample_reports_cross_references_first() {
        assert_eq!(
            rendered(&sample()),
            vec![
                "spec.containers.1.imageRef: image with name 'myServer' not found",
                "spec.containers.0.name: is required",
                "spec.images.0.uri: is required",
                "spec.images.0.tag: is required",
            ]
        );
    }

    #[test]
    fn missing_spec_is_required() {
        assert_eq!(rendered(&Manifest::default()), vec!["spec: is required"]);
    }

    #[test]
    fn empty_lists_need_items() {
        let manifest: Manifest = serde_json::from_str(r#"{"spec": {}}"#).expect("manifest json");
        assert_eq!(
            rendered(&manifest),
            vec![
                "spec.containers: must contain at least one item",
                "spec.images: must contain at least one item",
            ]
        );
    }

    #[test]
    fn renamed_field_uses_serde_name() {
        let manifest: Manifest = serde_json::from_str(
            r#"{"spec": {"containers": [{"name": "web"}], "images": [{"name": "a", "uri": "u", "tag": "t"}]}}"#,
        )
        .expect("manifest json");
        assert_eq!(rendered(&manifest), vec!["spec.containers.0.imageRef: is required"]);
    }
}
