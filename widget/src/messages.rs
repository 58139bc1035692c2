//! User-facing text for both widgets.
//!
//! Every string a visitor can see goes through here so errors are always
//! translated, never raw. English is the default; the Khmer catalog carries
//! the site's own wording.

use std::time::Duration;

use crate::error::WidgetError;
use crate::types::Role;
use crate::validation::ValidationIssue;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    English,
    Khmer,
}

impl Lang {
    /// Parse a language tag such as `en`, `km`, `khmer`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "km" | "kh" | "khmer" => Some(Self::Khmer),
            _ => None,
        }
    }
}

/// Which widget a message is shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Chat,
    Contact,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Messages {
    lang: Lang,
}

impl Messages {
    #[must_use]
    pub const fn new(lang: Lang) -> Self {
        Self { lang }
    }

    #[must_use]
    pub const fn english() -> Self {
        Self::new(Lang::English)
    }

    #[must_use]
    pub const fn khmer() -> Self {
        Self::new(Lang::Khmer)
    }

    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Seeded assistant turn for a fresh conversation.
    #[must_use]
    pub fn welcome(&self) -> &'static str {
        match self.lang {
            Lang::English => "Hello! I'm SrengBot. How can I help you?",
            Lang::Khmer => "សួស្តី! ខ្ញុំជា SrengBot។ តើខ្ញុំអាចជួយអ្នកយ៉ាងណាបាន?",
        }
    }

    /// Shown when the proxy answers with an empty reply.
    #[must_use]
    pub fn fallback_reply(&self) -> &'static str {
        match self.lang {
            Lang::English => "Sorry! I can't respond right now.",
            Lang::Khmer => "សូមអភ័យទោស! ខ្ញុំមិនអាចឆ្លើយតបបាននាពេលនេះទេ។",
        }
    }

    #[must_use]
    pub fn role_label(&self, role: Role) -> &'static str {
        match (self.lang, role) {
            (Lang::English, Role::User) => "You:",
            (Lang::Khmer, Role::User) => "អ្នក៖",
            (_, Role::Assistant) => "🤖:",
        }
    }

    #[must_use]
    pub fn sending(&self) -> &'static str {
        match self.lang {
            Lang::English => "Sending...",
            Lang::Khmer => "កំពុងផ្ញើ...",
        }
    }

    #[must_use]
    pub fn form_success(&self) -> &'static str {
        match self.lang {
            Lang::English => "Thank you! Your message was sent successfully.",
            Lang::Khmer => "សូមអរគុណ! សាររបស់អ្នកត្រូវបានផ្ញើដោយជោគជ័យ។",
        }
    }

    #[must_use]
    pub fn rate_limited(&self, wait: Duration) -> String {
        let secs = whole_seconds(wait);
        match self.lang {
            Lang::English => format!("Too many requests. Please wait {secs} seconds and try again."),
            Lang::Khmer => format!("សំណើច្រើនពេក។ សូមរង់ចាំ {secs} វិនាទី រួចព្យាយាមម្តងទៀត។"),
        }
    }

    #[must_use]
    pub fn issue(&self, issue: ValidationIssue) -> String {
        match self.lang {
            Lang::English => issue.to_string(),
            Lang::Khmer => khmer_issue(issue).to_owned(),
        }
    }

    /// Render any widget error as the single message shown to the user.
    #[must_use]
    pub fn for_error(&self, err: &WidgetError, surface: Surface) -> String {
        match err {
            WidgetError::Validation(issues) => issues
                .iter()
                .map(|i| self.issue(*i))
                .collect::<Vec<_>>()
                .join("\n"),
            WidgetError::RateLimited { wait } => self.rate_limited(*wait),
            WidgetError::Transport(_) => match self.lang {
                Lang::English => "Can't reach the server. Please check your internet connection.".to_owned(),
                Lang::Khmer => "មិនអាចតភ្ជាប់ទៅកាន់ Server បានទេ។ សូមពិនិត្យមើលអ៊ីនធឺណិតរបស់អ្នក។".to_owned(),
            },
            WidgetError::Captcha(_) => match self.lang {
                Lang::English => "Verification failed. Please reload the page and try again.".to_owned(),
                Lang::Khmer => "ការផ្ទៀងផ្ទាត់បានបរាជ័យ។ សូមផ្ទុកទំព័រឡើងវិញ ហើយព្យាយាមម្តងទៀត។".to_owned(),
            },
            WidgetError::Upstream { .. } => match (self.lang, surface) {
                (Lang::English, Surface::Chat) => "Something went wrong. Please try again later.".to_owned(),
                (Lang::English, Surface::Contact) => "Your message could not be sent. Please try again later.".to_owned(),
                (Lang::Khmer, Surface::Chat) => "មានបញ្ហាមួយបានកើតឡើង។ សូមព្យាយាមម្តងទៀតនៅពេលក្រោយ។".to_owned(),
                (Lang::Khmer, Surface::Contact) => "មានបញ្ហា: មិនអាចផ្ញើសារបានទេ។ សូមព្យាយាមម្តងទៀត។".to_owned(),
            },
        }
    }
}

/// Seconds shown to the user, rounded up so a pending wait never reads as 0.
fn whole_seconds(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

fn khmer_issue(issue: ValidationIssue) -> &'static str {
    match issue {
        ValidationIssue::ChatEmpty => "សូមសរសេរសាររបស់អ្នក។",
        ValidationIssue::ChatTooLong => "សារវែងពេក (អតិបរមា 500 តួអក្សរ)។",
        ValidationIssue::ChatMarkup => "សារមានខ្លឹមសារមិនត្រូវបានអនុញ្ញាត។",
        ValidationIssue::NameTooShort => "ឈ្មោះត្រូវមានយ៉ាងតិច 2 តួអក្សរ។",
        ValidationIssue::NameTooLong => "ឈ្មោះវែងពេក (អតិបរមា 50 តួអក្សរ)។",
        ValidationIssue::MessageTooShort => "សារត្រូវមានយ៉ាងតិច 10 តួអក្សរ។",
        ValidationIssue::MessageTooLong => "សារវែងពេក (អតិបរមា 1000 តួអក្សរ)។",
        ValidationIssue::InvalidEmail => "ទម្រង់អ៊ីមែលមិនត្រឹមត្រូវទេ។ សូមពិនិត្យម្តងទៀត។",
        ValidationIssue::InvalidPhone => "លេខទូរស័ព្ទមិនត្រឹមត្រូវទេ។",
    }
}
