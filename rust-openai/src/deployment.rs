//! Azure deployment name mapping.

use std::collections::HashMap;

/// 模型名到 Azure 部署名的映射。
///
/// 显式映射优先；否则去掉模型名中的 `.` 和 `:`（`gpt-3.5-turbo` → `gpt-35-turbo`），
/// 与 Azure 门户的默认部署命名一致。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentMapper {
    deployments: HashMap<String, String>,
}

impl DeploymentMapper {
    /// 创建空映射。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 增加一条显式映射。
    #[must_use]
    pub fn with_deployment(
        mut self,
        model: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        self.insert(model, deployment);
        self
    }

    /// 增加一条显式映射（原地）。
    pub fn insert(&mut self, model: impl Into<String>, deployment: impl Into<String>) {
        self.deployments.insert(model.into(), deployment.into());
    }

    /// 解析部署名。
    #[must_use]
    pub fn deployment_for(&self, model: &str) -> String {
        if let Some(deployment) = self.deployments.get(model) {
            return deployment.clone();
        }
        model.chars().filter(|c| !matches!(c, '.' | ':')).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for DeploymentMapper
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapper = Self::new();
        for (model, deployment) in iter {
            mapper.insert(model, deployment);
        }
        mapper
    }
}
