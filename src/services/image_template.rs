use std::collections::BTreeMap;

use minijinja::{Environment as TemplateEnv, UndefinedBehavior};

use crate::domain::{AppError, Environment, ImageReference};
use crate::domain::configuration::RegistryConfig;

/// Render the image reference for an environment and tag.
///
/// The template sees `environment`, `tag` and, when known, `project_id`.
/// Referencing an undefined variable is an error.
pub fn render_image_reference(
    registry: &RegistryConfig,
    project_id: Option<&str>,
    environment: &Environment,
    tag: &str,
) -> Result<ImageReference, AppError> {
    let mut env = TemplateEnv::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template("image", &registry.image_template)
        .map_err(|e| AppError::Template(format!("Invalid image template: {}", e)))?;

    let template = env.get_template("image").map_err(|e| AppError::Template(e.to_string()))?;
    let mut vars = BTreeMap::new();
    vars.insert("environment", environment.as_str());
    vars.insert("tag", tag);
    if let Some(project_id) = project_id {
        vars.insert("project_id", project_id);
    }

    let name = template
        .render(&vars)
        .map_err(|e| AppError::Template(format!("Failed to render image template: {}", e)))?;

    Ok(ImageReference { name: name.trim().to_string(), platform: registry.platform.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_default_template() {
        let image = render_image_reference(
            &RegistryConfig::default(),
            Some("my-project"),
            &Environment::Dev,
            "latest",
        )
        .unwrap();
        assert_eq!(
            image.name,
            "us-central1-docker.pkg.dev/my-project/prefect-images/parsons-prefect-dev:latest"
        );
        assert_eq!(image.platform, "linux/amd64");
    }

    #[test]
    fn renders_custom_template_with_tag() {
        let registry = RegistryConfig {
            image_template: "ghcr.io/org/flows-{{ environment }}:{{ tag }}".into(),
            platform: "linux/arm64".into(),
        };
        let image = render_image_reference(&registry, None, &Environment::Prod, "v1.2.3").unwrap();
        assert_eq!(image.name, "ghcr.io/org/flows-prod:v1.2.3");
    }

    #[test]
    fn unknown_variable_is_template_error() {
        let registry = RegistryConfig {
            image_template: "{{ registry_host }}/image".into(),
            platform: "linux/amd64".into(),
        };
        let result = render_image_reference(&registry, None, &Environment::Dev, "latest");
        assert!(matches!(result, Err(AppError::Template(_))));
    }

    #[test]
    fn missing_project_is_template_error_when_referenced() {
        let result =
            render_image_reference(&RegistryConfig::default(), None, &Environment::Dev, "latest");
        assert!(matches!(result, Err(AppError::Template(_))));
    }

    #[test]
    fn unclosed_tag_is_template_error() {
        let registry =
            RegistryConfig { image_template: "{{ tag".into(), platform: "linux/amd64".into() };
        let result = render_image_reference(&registry, None, &Environment::Dev, "latest");
        assert!(matches!(result, Err(AppError::Template(_))));
    }
}
