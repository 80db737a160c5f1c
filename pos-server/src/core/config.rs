use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志文件目录 |
/// | SERVICE_CHARGE_PERCENT | 5 | 服务费比例 |
/// | TAX_PERCENT | 10 | 税率 (PB1) |
/// | SEED_DEMO_DATA | 开发环境为 true | 加载演示数据 |
/// | AI_API_KEY | (未设置) | 启用 AI 文案/分析 |
/// | AI_MODEL | gemini-2.5-flash | 模型名称 |
/// | AI_ENDPOINT | https://generativelanguage.googleapis.com | 模型服务地址 |
/// | AI_TIMEOUT_MS | 8000 | 单次调用超时(毫秒) |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 TAX_PERCENT=11 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录
    pub log_dir: Option<String>,
    /// 服务费比例 (百分比)
    pub service_charge_percent: u32,
    /// 税率 (百分比)
    pub tax_percent: u32,
    /// 启动时加载演示商户与数据
    pub seed_demo_data: bool,
    /// AI 协作服务配置
    pub ai: AiConfig,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

/// AI 协作服务配置 (商品文案与销售分析)
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key; 为 `None` 时不发起调用, 直接返回兜底内容
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com".into(),
            timeout_ms: 8000,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let ai_defaults = AiConfig::default();

        Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            seed_demo_data: env_parse("SEED_DEMO_DATA").unwrap_or(environment == "development"),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            service_charge_percent: env_parse("SERVICE_CHARGE_PERCENT").unwrap_or(5),
            tax_percent: env_parse("TAX_PERCENT").unwrap_or(10),
            ai: AiConfig {
                api_key: std::env::var("AI_API_KEY").ok().filter(|k| !k.is_empty()),
                model: std::env::var("AI_MODEL").unwrap_or(ai_defaults.model),
                endpoint: std::env::var("AI_ENDPOINT").unwrap_or(ai_defaults.endpoint),
                timeout_ms: env_parse("AI_TIMEOUT_MS").unwrap_or(ai_defaults.timeout_ms),
            },
            jwt: JwtConfig::default(),
        }
    }

    /// 测试用配置: 固定 JWT 密钥, 无 AI, 不加载演示数据
    pub fn for_tests() -> Self {
        Self {
            http_port: 0,
            environment: "test".into(),
            log_level: "warn".into(),
            log_dir: None,
            service_charge_percent: 5,
            tax_percent: 10,
            seed_demo_data: false,
            ai: AiConfig::default(),
            jwt: JwtConfig {
                secret: "test-secret-key-with-at-least-32-characters".into(),
                expiration_minutes: 60,
                issuer: "pos-server".into(),
                audience: "pos-clients".into(),
            },
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_for_tests() {
        let config = Config::for_tests();
        assert_eq!(config.service_charge_percent, 5);
        assert_eq!(config.tax_percent, 10);
        assert!(!config.seed_demo_data);
        assert!(config.ai.api_key.is_none());
        assert!(!config.is_production());
    }
}
