//! Heuristic evaluation of a single call.
//!
//! Three built-in checks always run:
//! - frequency above [`FREQUENCY_THRESHOLD`]
//! - duration below [`MIN_DURATION_SECS`]
//! - any registry keyword appearing in the transcript
//!
//! Every check that fires contributes one reason. Additional checks can be
//! registered through the [`CallRule`] trait; none are active by default.

use super::keywords::KeywordRegistry;
use super::record::CallRecord;
use serde::Serialize;

/// Calls made more often than this are flagged.
pub const FREQUENCY_THRESHOLD: u64 = 10;

/// Calls shorter than this many seconds are flagged.
pub const MIN_DURATION_SECS: u64 = 10;

pub const REASON_HIGH_FREQUENCY: &str = "High call frequency detected";
pub const REASON_SHORT_DURATION: &str = "Call duration too short";
pub const REASON_KEYWORDS_PREFIX: &str = "Suspicious keywords detected: ";
pub const REASON_DEEPFAKE_VOICE: &str = "Potential deepfake voice detected";

/// Outcome of evaluating one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub flagged: bool,
    pub reasons: Vec<String>,
}

impl Verdict {
    fn flag(&mut self, reason: impl Into<String>) {
        self.flagged = true;
        self.reasons.push(reason.into());
    }

    /// Reasons joined for a single console line.
    pub fn summary(&self) -> String {
        self.reasons.join("; ")
    }
}

/// An additional check run after the built-in ones.
///
/// Returns `Ok(Some(reason))` when the call should be flagged.
pub trait CallRule: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, record: &CallRecord) -> Result<Option<String>, EvaluationError>;
}

/// Detects synthetic voices from call metadata.
pub trait VoiceAnalyzer: Send + Sync {
    fn is_synthetic(&self, record: &CallRecord) -> Result<bool, EvaluationError>;
}

/// Flags calls whose voice a [`VoiceAnalyzer`] reports as synthetic.
pub struct VoiceAnalysisRule<A> {
    analyzer: A,
}

impl<A: VoiceAnalyzer> VoiceAnalysisRule<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }
}

impl<A: VoiceAnalyzer> CallRule for VoiceAnalysisRule<A> {
    fn name(&self) -> &str {
        "deepfake-voice"
    }

    fn check(&self, record: &CallRecord) -> Result<Option<String>, EvaluationError> {
        if self.analyzer.is_synthetic(record)? {
            Ok(Some(REASON_DEEPFAKE_VOICE.to_string()))
        } else {
            Ok(None)
        }
    }
}

/// Runs the built-in checks plus any registered rules.
#[derive(Default)]
pub struct Evaluator {
    rules: Vec<Box<dyn CallRule>>,
}

impl Evaluator {
    /// Create an evaluator with only the built-in checks.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register an additional rule. Rules run in registration order.
    pub fn with_rule(mut self, rule: impl CallRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Names of the registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate a call against the built-in checks and every registered rule.
    pub fn evaluate(
        &self,
        record: &CallRecord,
        keywords: &KeywordRegistry,
    ) -> Result<Verdict, EvaluationError> {
        let mut verdict = evaluate(record, keywords);

        for rule in &self.rules {
            if let Some(reason) = rule.check(record)? {
                verdict.flag(reason);
            }
        }

        Ok(verdict)
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Apply the built-in checks to a call.
pub fn evaluate(record: &CallRecord, keywords: &KeywordRegistry) -> Verdict {
    let mut verdict = Verdict::default();

    if record.frequency() > FREQUENCY_THRESHOLD {
        verdict.flag(REASON_HIGH_FREQUENCY);
    }

    if record.duration_secs() < MIN_DURATION_SECS {
        verdict.flag(REASON_SHORT_DURATION);
    }

    let matched = keywords.matches(record.transcript());
    if !matched.is_empty() {
        verdict.flag(format!("{REASON_KEYWORDS_PREFIX}{}", matched.join(", ")));
    }

    verdict
}

/// A registered rule failed while evaluating a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    pub rule: String,
    pub message: String,
}

impl EvaluationError {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rule '{}' failed: {}", self.rule, self.message)
    }
}

impl std::error::Error for EvaluationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(duration: u64, frequency: u64, transcript: &str) -> CallRecord {
        CallRecord::new("T1", duration, frequency, transcript).unwrap()
    }

    struct FixedAnalyzer(Result<bool, EvaluationError>);

    impl VoiceAnalyzer for FixedAnalyzer {
        fn is_synthetic(&self, _record: &CallRecord) -> Result<bool, EvaluationError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_short_call_with_keyword() {
        let registry = KeywordRegistry::new();
        let verdict = evaluate(&record(5, 3, "please share your password"), &registry);

        assert!(verdict.flagged);
        assert_eq!(
            verdict.reasons,
            vec![
                "Call duration too short".to_string(),
                "Suspicious keywords detected: password".to_string(),
            ]
        );
    }

    #[test]
    fn test_high_frequency_only() {
        let registry = KeywordRegistry::new();
        let verdict = evaluate(&record(30, 15, "hello"), &registry);

        assert!(verdict.flagged);
        assert_eq!(verdict.reasons, vec!["High call frequency detected".to_string()]);
    }

    #[test]
    fn test_clean_call() {
        let registry = KeywordRegistry::new();
        let verdict = evaluate(&record(60, 2, "hello"), &registry);

        assert!(!verdict.flagged);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_frequency_boundary() {
        let registry = KeywordRegistry::empty();
        assert!(!evaluate(&record(60, 10, "x"), &registry).flagged);
        for frequency in [11, 12, 100, u64::MAX] {
            let verdict = evaluate(&record(60, frequency, "x"), &registry);
            assert!(verdict.flagged);
            assert!(verdict.reasons.contains(&REASON_HIGH_FREQUENCY.to_string()));
        }
    }

    #[test]
    fn test_duration_boundary() {
        let registry = KeywordRegistry::empty();
        for duration in 1..=9 {
            let verdict = evaluate(&record(duration, 1, "x"), &registry);
            assert!(verdict.flagged);
            assert!(verdict.reasons.contains(&REASON_SHORT_DURATION.to_string()));
        }
        for duration in [10, 11, 3600] {
            let verdict = evaluate(&record(duration, 1, "x"), &registry);
            assert!(!verdict.reasons.contains(&REASON_SHORT_DURATION.to_string()));
        }
    }

    #[test]
    fn test_all_rules_fire_together() {
        let registry = KeywordRegistry::new();
        let verdict = evaluate(&record(2, 20, "Your OTP for the bank account"), &registry);

        assert_eq!(
            verdict.reasons,
            vec![
                REASON_HIGH_FREQUENCY.to_string(),
                REASON_SHORT_DURATION.to_string(),
                "Suspicious keywords detected: otp, bank account".to_string(),
            ]
        );
        assert_eq!(
            verdict.summary(),
            "High call frequency detected; Call duration too short; Suspicious keywords detected: otp, bank account"
        );
    }

    #[test]
    fn test_injected_registry() {
        let mut registry = KeywordRegistry::empty();
        registry.add("Gift Card").unwrap();

        let verdict = evaluate(&record(60, 1, "buy a GIFT CARD now, not a password"), &registry);
        assert_eq!(
            verdict.reasons,
            vec!["Suspicious keywords detected: gift card".to_string()]
        );
    }

    #[test]
    fn test_default_evaluator_has_no_extra_rules() {
        let evaluator = Evaluator::new();
        assert!(evaluator.rule_names().is_empty());

        let verdict = evaluator
            .evaluate(&record(60, 2, "hello"), &KeywordRegistry::new())
            .unwrap();
        assert!(!verdict.flagged);
    }

    #[test]
    fn test_voice_rule_appends_reason() {
        let evaluator = Evaluator::new().with_rule(VoiceAnalysisRule::new(FixedAnalyzer(Ok(true))));
        assert_eq!(evaluator.rule_names(), vec!["deepfake-voice"]);

        let verdict = evaluator
            .evaluate(&record(5, 2, "hello"), &KeywordRegistry::new())
            .unwrap();
        assert_eq!(
            verdict.reasons,
            vec![
                REASON_SHORT_DURATION.to_string(),
                REASON_DEEPFAKE_VOICE.to_string(),
            ]
        );
    }

    #[test]
    fn test_failing_rule_propagates() {
        let evaluator = Evaluator::new().with_rule(VoiceAnalysisRule::new(FixedAnalyzer(Err(
            EvaluationError::new("deepfake-voice", "model unavailable"),
        ))));

        let err = evaluator
            .evaluate(&record(60, 2, "hello"), &KeywordRegistry::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Rule 'deepfake-voice' failed: model unavailable");
    }
}
