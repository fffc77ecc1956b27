// src/client.rs

use crate::{config::AppConfig, error::*};
use log::debug;
use reqwest::{
    Client, Proxy, Response,
    header::{self, HeaderMap, HeaderValue},
};
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    RetryTransientMiddleware, Retryable, RetryableStrategy, default_on_request_failure,
    policies::ExponentialBackoff,
};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// 视频详情接口的重试判定：任何非 2xx 状态码都视为暂时性错误
struct NonSuccessIsTransient;

impl RetryableStrategy for NonSuccessIsTransient {
    fn handle(&self, res: &Result<Response, reqwest_middleware::Error>) -> Option<Retryable> {
        match res {
            Ok(response) if response.status().is_success() => None,
            Ok(response) => {
                debug!("视频详情请求返回 {}，准备重试", response.status());
                Some(Retryable::Transient)
            }
            Err(error) => default_on_request_failure(error),
        }
    }
}

/// 整个运行期间共享的 HTTP 客户端。
///
/// 所有请求复用同一个连接池与 Cookie 存储；只有视频详情请求经过重试中间件。
#[derive(Clone)]
pub struct RobustClient {
    client: Client,
    detail_client: ClientWithMiddleware,
    cookie_store: Arc<CookieStoreMutex>,
    base_url: Url,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let cookie_store = Arc::new(CookieStoreMutex::new(CookieStore::default()));

        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(default_headers)
            .cookie_provider(Arc::clone(&cookie_store))
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.max_workers * 2);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &config.proxy {
            debug!("使用代理: {}", proxy);
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }
        let client = builder.build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.retry_interval, config.retry_interval)
            .build_with_max_retries(config.fetch_attempts.saturating_sub(1));
        let detail_client = ClientBuilder::new(client.clone())
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                NonSuccessIsTransient,
            ))
            .build();

        Ok(Self {
            client,
            detail_client,
            cookie_store,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// 在 Cookie 存储中按名称 (大小写不敏感) 查找 Cookie 的值
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        let store = self.cookie_store.lock().ok()?;
        store
            .iter_any()
            .find(|cookie| cookie.name().eq_ignore_ascii_case(name))
            .map(|cookie| cookie.value().to_string())
    }

    /// 不重试的普通 GET，非 2xx 状态码视为错误
    pub async fn get(&self, url: Url, headers: &HeaderMap) -> AppResult<Response> {
        let res = self.client.get(url).headers(headers.clone()).send().await?;
        Ok(res.error_for_status()?)
    }

    /// 向站内路径提交表单，不重试。
    ///
    /// 状态码原样返回：登录接口的状态码不可信，由调用方检查 Cookie。
    pub async fn post_form<T>(&self, path: &str, form: &T) -> AppResult<Response>
    where
        T: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        Ok(self.client.post(url).form(form).send().await?)
    }

    /// 请求视频详情，按配置的次数重试。
    ///
    /// 重试耗尽后原样返回最后一次响应，由调用方决定如何处理失败状态码。
    pub async fn get_video_detail(&self, url: Url, headers: &HeaderMap) -> AppResult<Response> {
        Ok(self
            .detail_client
            .get(url)
            .headers(headers.clone())
            .send()
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use clap::Parser;

    #[test]
    fn test_endpoint_joins_base_url() {
        let args = crate::cli::Cli::parse_from(["learning-dl", "-c", "c", "-u", "u", "--password", "p"]);
        let config = AppConfig::from_sources(
            &args,
            crate::config::ExternalConfig {
                network: crate::config::NetworkConfig {
                    base_url: Some("http://127.0.0.1:1234".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .unwrap();
        let client = RobustClient::new(Arc::new(config)).unwrap();
        assert_eq!(
            client.endpoint(constants::api::LOGIN_SUBMIT_PATH).unwrap().as_str(),
            "http://127.0.0.1:1234/uas/login-submit"
        );
        assert!(client.cookie_value("li_at").is_none());
    }
}
