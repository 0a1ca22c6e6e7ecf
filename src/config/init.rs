// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates a commented harmonia.yml template.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::AppName;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, app: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let name = AppName::new(app.unwrap_or("my-app"))?;

    std::fs::write(&config_path, generate_template_yaml(&name)).map_err(|source| {
        Error::Write {
            path: config_path.clone(),
            source,
        }
    })?;

    Ok(())
}

fn generate_template_yaml(name: &AppName) -> String {
    format!(
        r#"backend:
  base_url:
    env: HARMONIA_BACKEND_URL
    default: http://localhost:7007
  platform_app_name: opa-platform
  platform_region: us-east-1

# polling:
#   stack:
#     interval: 5s
#     max_iterations: 720
#   replicas:
#     start_interval: 5s
#     stop_interval: 7s
#     max_iterations: 120
#   retry:
#     transient_attempts: 0

app:
  name: {name}
  component_type: aws-app
  subtype: ecs                  # ecs | eks | serverless-rest-api
  iac_type: cdk                 # cdk | terraform
  provisioning: cloudformation  # cloudformation | terraform-cloud | terraform-aws
  entity_uid: 00000000-0000-0000-0000-000000000000
  managed_by_location: url:https://git.example.com/apps/{name}/-/blob/main/.backstage/catalog-info.yaml
  repository:
    provider: gitlab
    host: git.example.com
    project_group: aws-app
    name: {name}
  environments:
    - name: dev
      provider:
        name: dev-provider
        account: "123456789012"
        region: us-east-1
        prefix: opa
      stack_name: {name}-dev
      # template:
      #   s3_bucket_name: {name}-artifacts
      #   cf_file_name: packaged.yaml
      # eks:
      #   cluster_parameter: /opa/dev/cluster-arn
      #   namespace: {name}-dev
      #   admin_role_arn: arn:aws:iam::123456789012:role/{name}-dev-admin
      #   kubectl_function_arn: arn:aws:lambda:us-east-1:123456789012:function:kubectl
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn template_parses_as_config() {
        let name = AppName::new("orders").unwrap();
        let config = Config::from_yaml(&generate_template_yaml(&name)).unwrap();
        assert_eq!(config.app.name.as_str(), "orders");
        assert_eq!(config.app.environments.len(), 1);
    }
}
