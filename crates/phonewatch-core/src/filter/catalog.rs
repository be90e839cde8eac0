//! Built-in knowledge about OS and vendor noise.
//!
//! The catalog is built once at startup and shared read-only by every
//! evaluation. Text patterns are compiled into [`RegexSet`]s, matched
//! case-insensitively anywhere in the body.

use std::collections::HashSet;

use regex::{RegexSet, RegexSetBuilder};

use crate::Result;

/// Package identifiers of launchers, update services, system UI, telemetry
/// and store apps that never carry operator-relevant alerts.
pub const SYSTEM_PACKAGES: &[&str] = &[
    "com.android.systemui",
    "com.android.systemui.recents",
    "com.android.systemui.statusbar",
    "com.android.systemui.notification",
    "com.android.settings",
    "com.android.phone",
    "com.android.calendar",
    "com.android.shell",
    "com.android.documentsui",
    "com.android.packageinstaller",
    "com.android.providers.downloads",
    "com.android.providers.downloads.ui",
    "com.android.providers.media",
    "com.android.providers.media.documents",
    "com.android.providers.calendar",
    "com.android.providers.contacts",
    "com.android.providers.telephony",
    "com.android.providers.settings",
    "com.android.providers.userdictionary",
    "com.android.vending",
    "com.android.chrome",
    "com.google.android.gms",
    "com.google.android.deskclock",
    "com.google.android.apps.messaging",
    "com.oppo.ota",
    "com.nearme.romupdate",
    "com.xiaomi.mipicks",
    "ru.vk.store",
    "com.onlyone.app.FC",
];

/// Boilerplate OS strings: foreground-service notices, download and update
/// chatter, storage warnings, empty-content markers.
pub const SYSTEM_NOISE_PATTERNS: &[&str] = &[
    r"^No Content$",
    r"This service is running in the foreground",
    r"Download completed",
    r"Download failed",
    r"System update",
    r"OTA update",
    r"update available",
    r"Battery optimization",
    r"Storage space",
    r"storage (is )?(running )?low",
    r"Background app",
    r"App installed",
    r"App updated",
    r"Осталось совсем немного",
    r"Осталось:\s*\d+\s*%",
    r"Чтобы продолжить, подключитесь к Интернету",
    r"Безопасная загрузка проверенных приложений",
    r"Выполняем проверку контента",
    r"Нажмите, чтобы настроить",
    r"Ваш телефон был автоматически отсоединен",
];

/// Phrasing that marks an SMS as coming from a bank or a mobile operator:
/// verification codes, balance notices, named institutions.
pub const IMPORTANT_SMS_PATTERNS: &[&str] = &[
    r"Снятие наличных",
    r"Баланс:",
    r"Код:\s*\d+",
    r"код\s*\d+",
    r"код подтверждения",
    r"вход в.*код",
    r"Никому не сообщайте код",
    r"Пожалуйста, получив сообщение",
    r"Уважаемый Клиент",
    r"С заботой о Вас",
    r"Вам было отправлено СМС",
    r"Пытались с вами связаться",
    r"Обновление системы",
    r"Критическое обновление",
    r"voshel v.*Onlajn",
    r"Polzovatel.*voshel",
    r"RMX\d+",
    r"СберБизнес",
    r"Сбербанк",
    r"ВТБ",
    r"VTB",
    r"Альфа",
    r"Альфа-Банк",
    r"LOCKO",
    r"BLANC",
    r"Тинькофф",
    r"Райффайзен",
    r"Газпромбанк",
    r"МТС Банк",
    r"Росбанк",
    r"УралСиб",
    r"Хоум Кредит",
    r"Ренессанс Кредит",
    r"ОТП Банк",
    r"ЮниКредит Банк",
    r"Россельхозбанк",
    r"Почта Банк",
    r"МКБ",
    r"Ак Барс",
    r"Совкомбанк",
    r"Точка",
    r"Модульбанк",
    r"Банк Открытие",
    r"Промсвязьбанк",
    r"МТС",
    r"Билайн",
    r"МегаФон",
    r"Теле2",
    r"Yota",
    r"Ростелеком",
];

/// Immutable lists the engine consults after the rule table.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    system_packages: HashSet<String>,
    noise: RegexSet,
    important_sms: RegexSet,
}

impl FilterCatalog {
    /// Build a catalog from explicit lists.
    ///
    /// # Errors
    ///
    /// Returns an error if any text pattern is not a valid regular expression.
    pub fn new<P, N, S>(packages: P, noise_patterns: N, sms_patterns: S) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        N: IntoIterator,
        N::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Ok(Self {
            system_packages: packages.into_iter().map(Into::into).collect(),
            noise: compile(noise_patterns)?,
            important_sms: compile(sms_patterns)?,
        })
    }

    /// The built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern fails to compile.
    pub fn builtin() -> Result<Self> {
        Self::with_extra(&[], &[])
    }

    /// The built-in catalog extended with deployment-specific entries.
    ///
    /// # Errors
    ///
    /// Returns an error if any built-in or extra pattern fails to compile.
    pub fn with_extra(extra_packages: &[String], extra_noise: &[String]) -> Result<Self> {
        let packages = SYSTEM_PACKAGES
            .iter()
            .map(ToString::to_string)
            .chain(extra_packages.iter().cloned());
        let noise = SYSTEM_NOISE_PATTERNS
            .iter()
            .copied()
            .chain(extra_noise.iter().map(String::as_str));
        Self::new(packages, noise, IMPORTANT_SMS_PATTERNS)
    }

    /// Check if the package is a known OS/vendor package.
    #[must_use]
    pub fn is_system_package(&self, package: &str) -> bool {
        self.system_packages.contains(package)
    }

    /// Check if the text is system chatter. Blank text counts as noise.
    #[must_use]
    pub fn is_system_text(&self, text: &str) -> bool {
        text.trim().is_empty() || self.noise.is_match(text)
    }

    /// Check if the text looks like a bank or operator SMS.
    #[must_use]
    pub fn is_important_sms(&self, text: &str) -> bool {
        !text.trim().is_empty() && self.important_sms.is_match(text)
    }

    /// Number of system packages known to the catalog.
    #[must_use]
    pub fn system_package_count(&self) -> usize {
        self.system_packages.len()
    }
}

fn compile<I>(patterns: I) -> Result<RegexSet>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Ok(RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()?)
}
