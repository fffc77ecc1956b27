// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "downloads";
pub const DEFAULT_BASE_URL: &str = "https://www.linkedin.com";
pub const DEFAULT_RESOLUTION: &str = "_720";
pub const DEFAULT_MAX_WORKERS: usize = 10;
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 500;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const PASSWORD_ENV_VAR: &str = "LEARNING_DL_PASSWORD";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/66.0.3359.181 Safari/537.36";

pub const VIDEO_EXTENSION: &str = "mp4";
pub const SUBTITLE_EXTENSION: &str = "srt";

/// 流式写盘时每次写入的最大块大小
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

pub mod api {
    pub const LOGIN_SUBMIT_PATH: &str = "uas/login-submit";
    pub const DETAILED_COURSES_PATH: &str = "learning-api/detailedCourses";
    pub const COURSE_FIELDS: &str = "fullCourseUnlocked,releasedOn,exerciseFileUrls,exerciseFiles";

    pub mod login {
        pub const CSRF_INPUT_ID: &str = "loginCsrfParam-login";
        pub const CSRF_FORM_FIELD: &str = "loginCsrfParam";
        pub const USERNAME_FIELD: &str = "session_key";
        pub const PASSWORD_FIELD: &str = "session_password";
        pub const JS_ENABLED_FIELD: &str = "isJsEnabled";
    }

    pub mod cookies {
        /// 登录成功后才会下发的会话 Cookie
        pub const SESSION: &str = "li_at";
        pub const CSRF_SOURCE: &str = "JSESSIONID";
    }

    pub const CSRF_HEADER: &str = "Csrf-Token";
}
