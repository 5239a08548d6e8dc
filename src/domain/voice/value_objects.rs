//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 语音描述
///
/// 来自远端语音目录，刷新时整体替换，过滤时只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// 唯一标识，如 `en-US-AriaNeural`
    pub short_name: String,
    /// 本地化显示名称
    pub localized_name: String,
    /// BCP-47 区域，如 `pt-BR`
    pub locale: String,
    /// 性别，如 `Female`
    pub gender: String,
}

impl VoiceDescriptor {
    pub fn new(
        short_name: impl Into<String>,
        localized_name: impl Into<String>,
        locale: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            localized_name: localized_name.into(),
            locale: locale.into(),
            gender: gender.into(),
        }
    }
}

/// 语音过滤条件
///
/// 空字符串或纯空白视为"不限制"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceFilter {
    locale: Option<String>,
    gender: Option<String>,
}

impl VoiceFilter {
    pub fn new(locale: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            locale: non_blank(locale.into()),
            gender: non_blank(gender.into()),
        }
    }

    /// 不做任何限制
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = non_blank(locale.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = non_blank(gender.into());
        self
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.locale.is_none() && self.gender.is_none()
    }

    /// 区域与性别均按 ASCII 忽略大小写匹配
    pub fn matches(&self, voice: &VoiceDescriptor) -> bool {
        let locale_ok = self
            .locale()
            .map_or(true, |l| voice.locale.eq_ignore_ascii_case(l));
        let gender_ok = self
            .gender()
            .map_or(true, |g| voice.gender.eq_ignore_ascii_case(g));
        locale_ok && gender_ok
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
