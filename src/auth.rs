// src/auth.rs

use crate::{
    client::RobustClient,
    constants::api::{self, cookies, login as form},
    error::*,
};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use scraper::{Html, Selector};
use std::sync::LazyLock;

static CSRF_INPUT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("input#{}", form::CSRF_INPUT_ID)).unwrap()
});

/// 登录后得到的认证状态。
///
/// Cookie 由共享客户端的 Cookie 存储持有；这里保存从 Cookie 派生出的请求头。
/// 登录完成后只读，所有后续 API 请求都从这里读取认证头。
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    headers: HeaderMap,
}

impl AuthState {
    pub fn from_csrf_token(token: &str) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(token)
            .map_err(|e| AppError::Parse(format!("CSRF Cookie 值无法用作请求头: {}", e)))?;
        let name = HeaderName::from_bytes(api::CSRF_HEADER.as_bytes())
            .map_err(|e| AppError::Parse(format!("无效的请求头名称: {}", e)))?;
        headers.insert(name, value);
        Ok(Self { headers })
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// 从登录页 HTML 中提取隐藏表单字段里的 CSRF token
pub fn extract_csrf_token(html: &str) -> AppResult<String> {
    let document = Html::parse_document(html);
    document
        .select(&CSRF_INPUT_SELECTOR)
        .find_map(|input| input.value().attr("value"))
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Parse(format!("登录页中未找到 CSRF 字段 '{}'", form::CSRF_INPUT_ID))
        })
}

/// 两步登录：先取 CSRF token，再提交表单。
///
/// 登录接口即使失败也可能返回成功状态码，所以只以会话 Cookie 是否出现为准。
pub async fn login(client: &RobustClient, username: &str, password: &str) -> AppResult<AuthState> {
    info!("[*] Login step 1 - Getting CSRF token...");
    let body = client
        .get(client.base_url().clone(), &HeaderMap::new())
        .await?
        .text()
        .await?;
    let csrf = extract_csrf_token(&body)?;
    debug!("[*] CSRF: {}", csrf);
    info!("[*] Login step 1 - Done");

    info!("[*] Login step 2 - Logging In...");
    let params = [
        (form::USERNAME_FIELD, username),
        (form::PASSWORD_FIELD, password),
        (form::CSRF_FORM_FIELD, csrf.as_str()),
        (form::JS_ENABLED_FIELD, "false"),
    ];
    let res = client.post_form(api::LOGIN_SUBMIT_PATH, &params).await?;
    debug!("登录表单提交响应状态码: {}", res.status());

    if client.cookie_value(cookies::SESSION).is_none() {
        return Err(AppError::AuthFailed);
    }

    let jsession = client.cookie_value(cookies::CSRF_SOURCE).ok_or_else(|| {
        AppError::Parse(format!("登录后未找到 Cookie '{}'", cookies::CSRF_SOURCE))
    })?;
    let auth = AuthState::from_csrf_token(jsession.trim_matches('"'))?;
    info!("[*] Login step 2 - Done");
    Ok(auth)
}
