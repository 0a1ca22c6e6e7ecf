// ABOUTME: Config fixtures for integration tests.
// ABOUTME: Two-environment apps in the shapes the teardown and status paths care about.

use std::sync::Arc;

use harmonia::config::{AppConfig, Config};

/// Knobs for [`config_yaml`].
#[derive(Debug, Clone, Copy)]
pub struct AppShape {
    pub subtype: &'static str,
    pub iac_type: &'static str,
    pub provisioning: &'static str,
    pub repo_secret: bool,
}

impl AppShape {
    pub fn ecs_cdk() -> Self {
        Self {
            subtype: "ecs",
            iac_type: "cdk",
            provisioning: "cloudformation",
            repo_secret: true,
        }
    }

    pub fn eks_cdk() -> Self {
        Self {
            subtype: "eks",
            ..Self::ecs_cdk()
        }
    }

    pub fn terraform(provisioning: &'static str) -> Self {
        Self {
            subtype: "ecs",
            iac_type: "terraform",
            provisioning,
            repo_secret: false,
        }
    }
}

fn environment(name: &str, shape: AppShape) -> String {
    let eks = if shape.subtype == "eks" {
        format!(
            r#"
      eks:
        cluster_parameter: /opa/{name}/cluster-arn
        namespace: orders-{name}
        admin_role_arn: arn:aws:iam::111111111111:role/orders-{name}-admin
        kubectl_function_arn: arn:aws:lambda:us-east-1:111111111111:function:kubectl"#
        )
    } else {
        String::new()
    };
    format!(
        r#"
    - name: {name}
      provider:
        name: {name}-provider
        account: "111111111111"
        region: us-east-1
        prefix: opa
      stack_name: orders-{name}
      template:
        s3_bucket_name: orders-artifacts
        cf_file_name: packaged.yaml{eks}"#
    )
}

/// A harmonia.yml for an app named `orders` in `dev` and `prod`.
pub fn config_yaml(shape: AppShape, base_url: &str) -> String {
    let secret = if shape.repo_secret {
        "\n  repo_secret_arn: arn:aws:secretsmanager:us-east-1:111111111111:secret:orders-repo"
    } else {
        ""
    };
    format!(
        r#"backend:
  base_url: {base_url}
  platform_app_name: opa-platform
  platform_region: us-east-1

polling:
  stack:
    interval: 1s
    max_iterations: 5
  replicas:
    start_interval: 1s
    stop_interval: 1s
    max_iterations: 5

app:
  name: orders
  component_type: aws-app
  subtype: {subtype}
  iac_type: {iac_type}
  provisioning: {provisioning}
  entity_uid: 6f9c1f4e-2d1b-4c1a-9b55-0d6a7f0e1c11
  managed_by_location: url:https://git.example.com/aws-app/orders/catalog-info.yaml{secret}
  repository:
    provider: gitlab
    host: git.example.com
    project_group: aws-app
    name: orders
  environments:{dev}{prod}
"#,
        subtype = shape.subtype,
        iac_type = shape.iac_type,
        provisioning = shape.provisioning,
        dev = environment("dev", shape),
        prod = environment("prod", shape),
    )
}

pub fn config(shape: AppShape) -> Config {
    Config::from_yaml(&config_yaml(shape, "http://localhost:7007")).unwrap()
}

pub fn app(shape: AppShape) -> Arc<AppConfig> {
    Arc::new(config(shape).app)
}
