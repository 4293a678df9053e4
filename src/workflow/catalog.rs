//! Built-in Workflows
//!
//! Each workflow is a form plus an ordered list of completion steps. Later
//! steps may quote earlier outputs through `{step:key}` placeholders.

use super::form::FieldSpec;
use super::template::PromptTemplate;
use crate::ai::CompletionRequest;
use crate::types::{ForgeError, Result};

/// One completion call within a workflow
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub key: &'static str,
    pub heading: &'static str,
    pub system: &'static str,
    pub prompt: PromptTemplate,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Step {
    /// Build the request for this step from a rendered prompt
    pub fn request(&self, prompt: String) -> CompletionRequest {
        let mut request = CompletionRequest::new(self.system, prompt);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Workflow {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
    pub steps: &'static [Step],
    /// Whether an opportunity matrix may be attached to the report
    pub supports_matrix: bool,
}

pub fn all() -> &'static [Workflow] {
    WORKFLOWS
}

pub fn find(name: &str) -> Result<&'static Workflow> {
    WORKFLOWS.iter().find(|w| w.name == name).ok_or_else(|| {
        let names: Vec<&str> = WORKFLOWS.iter().map(|w| w.name).collect();
        ForgeError::Validation(format!(
            "unknown workflow '{}' (available: {})",
            name,
            names.join(", ")
        ))
    })
}

const WORKFLOWS: &[Workflow] = &[PROBLEM, SOLUTIONS, VALIDATE, COMPETITORS];

// =============================================================================
// Problem analysis
// =============================================================================

const PROBLEM: Workflow = Workflow {
    name: "problem",
    title: "Problem Analysis",
    description: "Summarize a problem, gather evidence, and assess market potential and obstacles",
    fields: &[
        FieldSpec::required(
            "problem",
            "What is the core problem you are facing?",
            "One or two sentences, including the industry, process or setting where it occurs.",
        ),
        FieldSpec::required(
            "effect",
            "What is the immediate effect of the problem?",
            "The direct consequences and why they matter. Numbers can come later.",
        ),
        FieldSpec::optional(
            "context",
            "In which situations is the problem more or less relevant?",
            "Conditions under which the problem gets worse or disappears.",
        ),
        FieldSpec::required(
            "affected",
            "Who is particularly affected?",
            "People, firms, public bodies or other groups that bear the problem.",
        ),
        FieldSpec::required(
            "challenges",
            "What makes this problem hard to remove?",
            "Restrictions, interdependencies and costs that defeat obvious solutions.",
        ),
    ],
    steps: &[
        Step {
            key: "summary",
            heading: "Problem Summary with Insights",
            system: "You are an analyst who writes concise summaries of complex problems and adds insights that sharpen them.",
            prompt: PromptTemplate::new(
                "
Summarize the problem below and add the insights that matter most for understanding it.

Problem: {problem}
Immediate effect: {effect}
Context: {context}
Affected parties: {affected}
Why it is hard to solve: {challenges}
",
            ),
            max_tokens: None,
            temperature: None,
        },
        Step {
            key: "evidence",
            heading: "Empirical Evidence and Data-Driven Arguments",
            system: "You are a researcher who backs claims with statistics, studies and expert opinion.",
            prompt: PromptTemplate::new(
                "
Give empirical evidence and data-driven arguments for the relevance and size of this problem.

Problem: {problem}
Immediate effect: {effect}
Affected parties: {affected}
",
            ),
            max_tokens: None,
            temperature: None,
        },
        Step {
            key: "potential",
            heading: "Market Potential Analysis",
            system: "You are a market analyst who evaluates market size, profitability and adoption readiness.",
            prompt: PromptTemplate::new(
                "
Assess the market potential of solving this problem: market size, profitability and readiness to adopt.
Include an estimate of the total addressable market with a short justification.

Problem: {problem}
Immediate effect: {effect}
Affected parties: {affected}
Why it is hard to solve: {challenges}
",
            ),
            max_tokens: None,
            temperature: None,
        },
        Step {
            key: "obstacles",
            heading: "Challenges Analysis",
            system: "You analyze obstacles to technology development and market entry, including technical, societal and legal issues.",
            prompt: PromptTemplate::new(
                "
Identify the main challenges in solving this problem under two headings:
1. Technology development challenges.
2. Market entry challenges, including regulation, competition and acceptance.

Problem: {problem}
Immediate effect: {effect}
Affected parties: {affected}
",
            ),
            max_tokens: None,
            temperature: None,
        },
    ],
    supports_matrix: true,
};

// =============================================================================
// Solution ideas
// =============================================================================

const SOLUTIONS: Workflow = Workflow {
    name: "solutions",
    title: "Innovative Solutions",
    description: "Suggest five technology-based solutions for a problem and its audience",
    fields: &[
        FieldSpec::required(
            "problem",
            "Describe the problem",
            "What is the problem you want to solve?",
        ),
        FieldSpec::required(
            "audience",
            "Who has the problem?",
            "The group or individuals affected by the problem.",
        ),
    ],
    steps: &[Step {
        key: "solutions",
        heading: "Innovative Solutions",
        system: "You are an innovation and technology expert who designs new products, software, services and processes.",
        prompt: PromptTemplate::new(
            "
Suggest five distinct technology-based solutions for the problem below. For each, describe the
technology involved, how the product or service works, and what it would look like to its users.

Problem: {problem}
Target audience: {audience}
",
        ),
        max_tokens: None,
        temperature: None,
    }],
    supports_matrix: false,
};

// =============================================================================
// Idea validation
// =============================================================================

const VALIDATE: Workflow = Workflow {
    name: "validate",
    title: "Startup Idea Validation",
    description: "Derive hypotheses, an MVP roadmap and first tests for a startup idea",
    fields: &[
        FieldSpec::required(
            "problem",
            "Describe the problem",
            "The pain points customers have and the outcome they want.",
        ),
        FieldSpec::required(
            "solution",
            "Describe your solution or idea",
            "How the solution addresses the problem and its key value proposition.",
        ),
        FieldSpec::required(
            "segments",
            "Who are your target customers?",
            "The customer segments or user groups that benefit most.",
        ),
    ],
    steps: &[
        Step {
            key: "hypotheses",
            heading: "Hypotheses for Validation",
            system: "You are a startup advisor who gives specific and practical advice.",
            prompt: PromptTemplate::new(
                "
Problem: {problem}
Solution: {solution}
Customer segments: {segments}

Formulate:
1. A value hypothesis covering the open questions about whether the solution solves these segments' problems.
2. A growth hypothesis covering scalability and market potential within these segments.
3. Further hypotheses on pricing, market size or customer behaviour.
Then list four or five one-sentence hypotheses on the most critical uncertainties.
",
            ),
            max_tokens: Some(500),
            temperature: Some(0.7),
        },
        Step {
            key: "mvp",
            heading: "Minimum Viable Product and Feature Roadmap",
            system: "You are a startup advisor who gives specific and practical advice.",
            prompt: PromptTemplate::new(
                "
Problem: {problem}
Solution: {solution}
Customer segments: {segments}

Propose a tightly scoped minimum viable product with only the features needed to test the core
hypothesis with these segments, then a roadmap for adding features through low-risk prototypes,
simulations or experiments.
",
            ),
            max_tokens: Some(500),
            temperature: Some(0.7),
        },
        Step {
            key: "tests",
            heading: "Recommendations for Initial Testing",
            system: "You are a startup advisor who gives specific and practical advice.",
            prompt: PromptTemplate::new(
                "
Hypotheses:
{step:hypotheses}

MVP suggestions:
{step:mvp}

Recommend the three most important first tests, analyses or studies to validate these assumptions
with the target segments. Include questions to ask, data to analyse, which test customers to involve
and the financial variables to check.
",
            ),
            max_tokens: Some(500),
            temperature: Some(0.7),
        },
    ],
    supports_matrix: false,
};

// =============================================================================
// Competitor scan
// =============================================================================

const COMPETITORS: Workflow = Workflow {
    name: "competitors",
    title: "Competitor Analysis",
    description: "List competing offers, the features that resonate, and hypotheses to test",
    fields: &[FieldSpec::required(
        "solution",
        "Describe the solution you are working on",
        "A detailed description of the product or service idea.",
    )],
    steps: &[
        Step {
            key: "competitors",
            heading: "Competitor Analysis",
            system: "You are a market analyst.",
            prompt: PromptTemplate::new(
                "
List companies offering solutions similar to this one:
\"{solution}\"

For each company give its name, a short description of its products or services and, where
possible, links to articles or reviews that discuss it.
",
            ),
            max_tokens: Some(1000),
            temperature: Some(0.7),
        },
        Step {
            key: "features",
            heading: "Key Features Resonating in the Market",
            system: "You are a market analyst.",
            prompt: PromptTemplate::new(
                "
Considering companies that offer solutions similar to:
\"{solution}\"

Which competitor features resonate most with the market and paying users? List them with a short
explanation of why each matters, adding sources where possible.
",
            ),
            max_tokens: Some(1000),
            temperature: Some(0.7),
        },
        Step {
            key: "hypotheses",
            heading: "Key Hypotheses to Test",
            system: "You are a market analyst.",
            prompt: PromptTemplate::new(
                "
Considering companies that offer solutions similar to:
\"{solution}\"

Which key hypotheses must be tested to make sure the product meets customer needs? List each with
a short description of the open question behind it.
",
            ),
            max_tokens: Some(1000),
            temperature: Some(0.7),
        },
    ],
    supports_matrix: false,
};
