//! Test scenario definitions.

use rclr_core::{
    Conversion, ConvertError, Converter, ConverterConfig, HostValue, MemoryEngine, SexpPtr,
};
use serde::{Deserialize, Serialize};

use crate::diff::SnapshotDiff;
use crate::snapshot::SexpSnapshot;

/// A conversion scenario.
///
/// Defines the input value, the flags it is converted under, and the expected
/// consequences.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,

    /// Description of what this scenario tests.
    pub description: String,

    /// Feature flags for the converter.
    pub config: ConverterConfig,

    /// Value handed to the converter.
    pub input: HostValue,

    /// Use the strict entry point instead of the lenient one.
    pub strict: bool,

    /// Expected outcomes.
    pub expect: Expectation,
}

/// Expected outcomes after running a scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Expectation {
    /// Expected result of the call.
    pub result: Option<ExpectedResult>,

    /// Expected number of retained handles after the call.
    pub retained: Option<usize>,
}

/// What a single call should produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExpectedResult {
    /// A handle whose tree matches the snapshot.
    Converted { snapshot: SexpSnapshot },
    /// The input comes back as is.
    Unchanged,
    /// The null result.
    Null,
    /// The call fails with this `error_type()`.
    Fails { error_type: String },
}

impl Scenario {
    /// Create a new scenario builder.
    pub fn builder(name: &str, input: impl Into<HostValue>) -> ScenarioBuilder {
        ScenarioBuilder::new(name, input.into())
    }
}

/// Builder for creating scenarios.
pub struct ScenarioBuilder {
    name: String,
    description: String,
    config: ConverterConfig,
    input: HostValue,
    strict: bool,
    expect: Expectation,
}

impl ScenarioBuilder {
    /// Create a new builder.
    pub fn new(name: &str, input: HostValue) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            config: ConverterConfig::default(),
            input,
            strict: false,
            expect: Expectation::default(),
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn convert_vectors(mut self, enabled: bool) -> Self {
        self.config.convert_vectors = enabled;
        self
    }

    pub fn convert_value_types(mut self, enabled: bool) -> Self {
        self.config.convert_value_types = enabled;
        self
    }

    /// Go through `convert_or_fail`.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn expect_converted(mut self, snapshot: SexpSnapshot) -> Self {
        self.expect.result = Some(ExpectedResult::Converted { snapshot });
        self
    }

    pub fn expect_unchanged(mut self) -> Self {
        self.expect.result = Some(ExpectedResult::Unchanged);
        self
    }

    pub fn expect_null(mut self) -> Self {
        self.expect.result = Some(ExpectedResult::Null);
        self
    }

    pub fn expect_failure(mut self, error_type: &str) -> Self {
        self.expect.result = Some(ExpectedResult::Fails {
            error_type: error_type.to_string(),
        });
        self
    }

    pub fn expect_retained(mut self, count: usize) -> Self {
        self.expect.retained = Some(count);
        self
    }

    /// Build the scenario.
    pub fn build(self) -> Scenario {
        Scenario {
            name: self.name,
            description: self.description,
            config: self.config,
            input: self.input,
            strict: self.strict,
            expect: self.expect,
        }
    }
}

/// Result of running a scenario.
#[derive(Debug)]
pub enum ScenarioResult {
    /// All expectations hold.
    Pass,
    /// The call produced a different kind of result.
    UnexpectedOutcome { expected: String, actual: String },
    /// The converted value differs from the snapshot.
    Mismatch { diff: SnapshotDiff },
    /// The retention arena holds a different number of handles.
    RetainedMismatch { expected: usize, actual: usize },
}

impl ScenarioResult {
    /// Check if the scenario passed.
    pub fn passed(&self) -> bool {
        matches!(self, ScenarioResult::Pass)
    }
}

impl std::fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioResult::Pass => write!(f, "pass"),
            ScenarioResult::UnexpectedOutcome { expected, actual } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            ScenarioResult::Mismatch { diff } => write!(f, "{}", diff.report()),
            ScenarioResult::RetainedMismatch { expected, actual } => {
                write!(f, "expected {} retained handles, got {}", expected, actual)
            }
        }
    }
}

/// What the call actually did.
enum Observed {
    Converted(SexpPtr),
    Unchanged,
    Null,
    Failed(ConvertError),
}

impl Observed {
    fn describe(&self) -> String {
        match self {
            Observed::Converted(ptr) => format!("converted {ptr}"),
            Observed::Unchanged => "unchanged".to_string(),
            Observed::Null => "null".to_string(),
            Observed::Failed(e) => format!("failure {} ({})", e.error_type(), e),
        }
    }
}

fn describe(expected: &ExpectedResult) -> String {
    match expected {
        ExpectedResult::Converted { .. } => "converted".to_string(),
        ExpectedResult::Unchanged => "unchanged".to_string(),
        ExpectedResult::Null => "null".to_string(),
        ExpectedResult::Fails { error_type } => format!("failure {}", error_type),
    }
}

/// Run `scenario` on a fresh converter over a [`MemoryEngine`].
pub fn run_scenario(scenario: &Scenario) -> ScenarioResult {
    let mut conv = Converter::with_config(MemoryEngine::new(), scenario.config);
    run_scenario_with(&mut conv, scenario)
}

/// Run `scenario` on an existing converter. The converter's own flags are
/// replaced by the scenario's.
pub fn run_scenario_with(
    conv: &mut Converter<MemoryEngine>,
    scenario: &Scenario,
) -> ScenarioResult {
    conv.set_config(scenario.config);

    let observed = if scenario.strict {
        match conv.convert_or_fail(&scenario.input) {
            Ok(sexp) => Observed::Converted(sexp.ptr()),
            Err(e) => Observed::Failed(e),
        }
    } else {
        match conv.convert_to_r(scenario.input.clone()) {
            Ok(Conversion::Foreign(ptr)) => Observed::Converted(ptr),
            Ok(Conversion::Unchanged(_)) => Observed::Unchanged,
            Ok(Conversion::Null) => Observed::Null,
            Err(e) => Observed::Failed(e),
        }
    };

    if let Some(expected) = &scenario.expect.result {
        let matches = match (expected, &observed) {
            (ExpectedResult::Converted { snapshot }, Observed::Converted(ptr)) => {
                let actual = match SexpSnapshot::capture(conv.engine(), *ptr) {
                    Ok(actual) => actual,
                    Err(e) => {
                        return ScenarioResult::UnexpectedOutcome {
                            expected: describe(expected),
                            actual: e.to_string(),
                        }
                    }
                };
                let diff = SnapshotDiff::compare(snapshot, &actual);
                if !diff.is_empty() {
                    return ScenarioResult::Mismatch { diff };
                }
                true
            }
            (ExpectedResult::Unchanged, Observed::Unchanged) => true,
            (ExpectedResult::Null, Observed::Null) => true,
            (ExpectedResult::Fails { error_type }, Observed::Failed(e)) => {
                e.error_type() == error_type.as_str()
            }
            _ => false,
        };
        if !matches {
            return ScenarioResult::UnexpectedOutcome {
                expected: describe(expected),
                actual: observed.describe(),
            };
        }
    }

    if let Some(expected) = scenario.expect.retained {
        let actual = conv.arena().len();
        if actual != expected {
            return ScenarioResult::RetainedMismatch { expected, actual };
        }
    }

    ScenarioResult::Pass
}

/// Standard conversion scenarios.
pub mod standard {
    use super::*;
    use indexmap::IndexMap;
    use jiff::SignedDuration;

    pub fn double_round_trip() -> Scenario {
        Scenario::builder("double_round_trip", 2.5)
            .description("A double becomes a length-one numeric vector")
            .expect_converted(SexpSnapshot::numeric(&[2.5]))
            .expect_retained(1)
            .build()
    }

    pub fn rectangular_jagged() -> Scenario {
        Scenario::builder("rectangular_jagged", vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
            .description("Equal-length rows become a column-major matrix")
            .expect_converted(SexpSnapshot::numeric_matrix(2, 3, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]))
            .build()
    }

    pub fn ragged_jagged() -> Scenario {
        Scenario::builder("ragged_jagged", vec![vec![1, 2], vec![3]])
            .description("Ragged rows become a list of integer vectors")
            .expect_converted(SexpSnapshot::list(vec![
                SexpSnapshot::integer(&[1, 2]),
                SexpSnapshot::integer(&[3]),
            ]))
            .build()
    }

    pub fn keyed_doubles() -> Scenario {
        let map: IndexMap<String, f64> = [("a", 1.0), ("b", 2.0), ("c", 3.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Scenario::builder("keyed_doubles", map)
            .description("Keys become names of a list, in iteration order")
            .expect_converted(
                SexpSnapshot::list(vec![
                    SexpSnapshot::numeric(&[1.0]),
                    SexpSnapshot::numeric(&[2.0]),
                    SexpSnapshot::numeric(&[3.0]),
                ])
                .with_names(&["a", "b", "c"]),
            )
            .build()
    }

    pub fn duration_seconds() -> Scenario {
        Scenario::builder("duration_seconds", SignedDuration::from_secs(90))
            .description("A duration becomes difftime in seconds")
            .expect_converted(SexpSnapshot::difftime(&[90.0]))
            .build()
    }

    pub fn logical_passes_through() -> Scenario {
        Scenario::builder("logical_passes_through", true)
            .description("Booleans have no registered converter")
            .expect_unchanged()
            .expect_retained(0)
            .build()
    }

    pub fn null_is_a_no_op() -> Scenario {
        Scenario::builder("null_is_a_no_op", HostValue::Null)
            .description("Null converts to the null result and retains nothing")
            .expect_null()
            .expect_retained(0)
            .build()
    }

    pub fn strict_null_fails() -> Scenario {
        Scenario::builder("strict_null_fails", HostValue::Null)
            .description("The strict path rejects null")
            .strict()
            .expect_failure("null_argument")
            .build()
    }

    pub fn vectors_off() -> Scenario {
        Scenario::builder("vectors_off", vec![1.0, 2.0])
            .description("With vector conversion off, arrays pass through")
            .convert_vectors(false)
            .expect_unchanged()
            .build()
    }

    /// All standard scenarios.
    pub fn all() -> Vec<Scenario> {
        vec![
            double_round_trip(),
            rectangular_jagged(),
            ragged_jagged(),
            keyed_doubles(),
            duration_seconds(),
            logical_passes_through(),
            null_is_a_no_op(),
            strict_null_fails(),
            vectors_off(),
        ]
    }
}
