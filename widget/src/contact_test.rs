use super::*;
use crate::proxy::ProxyError;
use crate::rate_limit::RateLimitConfig;
use crate::types::{ChatReply, ChatRequest, SuccessBody};
use std::sync::Mutex;
use std::time::Duration;

// =========================================================================
// Mocks
// =========================================================================

#[derive(Default)]
struct MockProxy {
    outcomes: Mutex<Vec<Result<SuccessBody, ProxyError>>>,
    submitted: Mutex<Vec<ContactForm>>,
}

impl MockProxy {
    fn with_outcomes(outcomes: Vec<Result<SuccessBody, ProxyError>>) -> Arc<Self> {
        Arc::new(Self { outcomes: Mutex::new(outcomes), submitted: Mutex::new(Vec::new()) })
    }

    fn submitted(&self) -> Vec<ContactForm> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProxyClient for MockProxy {
    async fn send_chat(&self, _request: &ChatRequest) -> Result<ChatReply, ProxyError> {
        unreachable!("contact widget never chats")
    }

    async fn submit_contact(&self, form: &ContactForm) -> Result<SuccessBody, ProxyError> {
        self.submitted.lock().unwrap().push(form.clone());
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            Ok(SuccessBody { message: "Message sent successfully!".into() })
        } else {
            outcomes.remove(0)
        }
    }
}

struct FixedCaptcha(Result<String, String>);

#[async_trait::async_trait]
impl CaptchaProvider for FixedCaptcha {
    async fn token(&self, action: &str) -> Result<String, CaptchaError> {
        assert_eq!(action, CAPTCHA_ACTION);
        self.0.clone().map_err(CaptchaError)
    }
}

#[derive(Default)]
struct RecordingView {
    statuses: Vec<(String, StatusKind)>,
    submit_enabled: Vec<bool>,
    resets: usize,
}

impl ContactView for RecordingView {
    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled.push(enabled);
    }

    fn show_status(&mut self, message: &str, kind: StatusKind) {
        self.statuses.push((message.to_owned(), kind));
    }

    fn reset_form(&mut self) {
        self.resets += 1;
    }
}

fn valid_form() -> ContactForm {
    ContactForm {
        name: "  Valid Name ".into(),
        email: "visitor@example.com".into(),
        phonenumber: String::new(),
        message: "This message is long enough.".into(),
        captcha_token: None,
    }
}

fn widget(proxy: Arc<MockProxy>) -> ContactWidget {
    ContactWidget::new(proxy, RateLimiter::new(RateLimitConfig::form()), Messages::english())
}

// =========================================================================
// success
// =========================================================================

#[tokio::test]
async fn valid_submission_is_trimmed_sent_and_form_reset() {
    let proxy = MockProxy::with_outcomes(vec![]);
    let mut w = widget(proxy.clone());
    let mut view = RecordingView::default();

    w.on_submit_form(&valid_form(), &mut view).await.unwrap();

    let sent = proxy.submitted();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Valid Name");
    assert_eq!(sent[0].captcha_token, None);

    assert_eq!(view.submit_enabled, vec![false, true]);
    assert_eq!(view.statuses[0].1, StatusKind::Pending);
    assert_eq!(view.statuses.last().unwrap().1, StatusKind::Success);
    assert_eq!(view.resets, 1);
    assert_eq!(w.state(), ContactState::Idle);
}

#[tokio::test]
async fn captcha_token_is_attached_when_enabled() {
    let proxy = MockProxy::with_outcomes(vec![]);
    let mut w = widget(proxy.clone()).with_captcha(Arc::new(FixedCaptcha(Ok("tok-1".into()))));
    let mut view = RecordingView::default();

    w.on_submit_form(&valid_form(), &mut view).await.unwrap();
    assert_eq!(proxy.submitted()[0].captcha_token.as_deref(), Some("tok-1"));
}

// =========================================================================
// local rejections
// =========================================================================

#[tokio::test]
async fn validation_reports_all_issues_without_network() {
    let proxy = MockProxy::with_outcomes(vec![]);
    let mut w = widget(proxy.clone());
    let mut view = RecordingView::default();

    let form = ContactForm { name: "A".into(), message: "short".into(), ..ContactForm::default() };
    let err = w.on_submit_form(&form, &mut view).await.unwrap_err();

    let WidgetError::Validation(issues) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(issues.len(), 2);
    assert!(proxy.submitted().is_empty());
    assert!(view.submit_enabled.is_empty());

    let (text, kind) = view.statuses.last().unwrap();
    assert_eq!(*kind, StatusKind::Error);
    assert_eq!(text.lines().count(), 2);
}

#[tokio::test]
async fn fourth_submission_in_window_is_rate_limited() {
    let proxy = MockProxy::with_outcomes(vec![]);
    let mut w = widget(proxy.clone());
    let mut view = RecordingView::default();

    for _ in 0..3 {
        w.on_submit_form(&valid_form(), &mut view).await.unwrap();
    }
    let err = w.on_submit_form(&valid_form(), &mut view).await.unwrap_err();
    let WidgetError::RateLimited { wait } = err else {
        panic!("expected rate limit, got {err:?}");
    };
    assert!(wait > Duration::ZERO && wait <= Duration::from_secs(300));
    assert_eq!(proxy.submitted().len(), 3);
}

#[tokio::test]
async fn invalid_submissions_do_not_use_up_slots() {
    let proxy = MockProxy::with_outcomes(vec![]);
    let mut w = ContactWidget::new(
        proxy,
        RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(300))),
        Messages::english(),
    );
    let mut view = RecordingView::default();

    let bad = ContactForm { name: "A".into(), ..valid_form() };
    assert!(w.on_submit_form(&bad, &mut view).await.is_err());
    assert!(w.on_submit_form(&valid_form(), &mut view).await.is_ok());
}

// =========================================================================
// network failures
// =========================================================================

#[tokio::test]
async fn upstream_error_is_generic_and_form_kept() {
    let proxy = MockProxy::with_outcomes(vec![Err(ProxyError::Upstream {
        status: 400,
        error: Some("reCAPTCHA verification failed.".into()),
    })]);
    let mut w = widget(proxy);
    let mut view = RecordingView::default();

    let err = w.on_submit_form(&valid_form(), &mut view).await.unwrap_err();
    assert_eq!(err, WidgetError::Upstream { status: 400 });
    assert_eq!(view.resets, 0);
    assert_eq!(view.submit_enabled, vec![false, true]);

    let (text, kind) = view.statuses.last().unwrap();
    assert_eq!(*kind, StatusKind::Error);
    assert!(!text.contains("reCAPTCHA"));
}

#[tokio::test]
async fn captcha_failure_skips_submission() {
    let proxy = MockProxy::with_outcomes(vec![]);
    let mut w = widget(proxy.clone()).with_captcha(Arc::new(FixedCaptcha(Err("script blocked".into()))));
    let mut view = RecordingView::default();

    let err = w.on_submit_form(&valid_form(), &mut view).await.unwrap_err();
    assert!(matches!(err, WidgetError::Captcha(_)));
    assert!(proxy.submitted().is_empty());
    assert_eq!(w.state(), ContactState::Idle);
    assert_eq!(view.submit_enabled.last(), Some(&true));
}
