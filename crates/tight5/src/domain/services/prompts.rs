//! Prompt Pipeline - (system instruction, user content) pairs for every assistant task
//!
//! Builders are pure. User text is passed through [`sanitize_fragment`] before it is embedded,
//! and every prompt ends by asking for bare JSON.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::{
    AssistantTask, PerformanceSummary, PlacementCandidate, RoutineJokeSummary, SelectedPartOption,
    StructureTemplate,
};
use crate::domain::errors::DomainError;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Persona a request is sent under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPrompt {
    JokeGeneration,
    JokeImprovement,
    JokeAnalysis,
    RoutineAnalysis,
    RoutineOptimization,
    PerformanceAnalysis,
}

impl SystemPrompt {
    pub fn text(&self) -> &'static str {
        match self {
            SystemPrompt::JokeGeneration => JOKE_GENERATION,
            SystemPrompt::JokeImprovement => JOKE_IMPROVEMENT,
            SystemPrompt::JokeAnalysis => JOKE_ANALYSIS,
            SystemPrompt::RoutineAnalysis => ROUTINE_ANALYSIS,
            SystemPrompt::RoutineOptimization => ROUTINE_OPTIMIZATION,
            SystemPrompt::PerformanceAnalysis => PERFORMANCE_ANALYSIS,
        }
    }
}

/// Everything needed to make one model call
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub system: SystemPrompt,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl PromptRequest {
    fn new(system: SystemPrompt, user: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            system,
            user,
            temperature,
            max_tokens,
        }
    }
}

/// Make user text safe to embed in a prompt: no angle brackets, no fences, no double quotes,
/// single-spaced.
pub fn sanitize_fragment(input: &str) -> String {
    let stripped: String = input
        .replace("```", "")
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();
    WHITESPACE_RE.replace_all(stripped.trim(), " ").into_owned()
}

const JSON_ARRAY: &str = "Return ONLY a JSON array (no markdown, no code blocks):";
const JSON_OBJECT: &str = "Return ONLY a JSON object (no markdown, no code blocks):";

/// Build the request for a task
pub fn build(task: &AssistantTask) -> Result<PromptRequest, DomainError> {
    let request = match task {
        AssistantTask::SetupGeneration { premise } => PromptRequest::new(
            SystemPrompt::JokeGeneration,
            setup_prompt(premise),
            0.8,
            500,
        ),
        AssistantTask::PunchlineGeneration { setup } => PromptRequest::new(
            SystemPrompt::JokeGeneration,
            punchline_prompt(setup),
            0.8,
            500,
        ),
        AssistantTask::StructurePart {
            premise,
            template,
            part_id,
            selections,
        } => PromptRequest::new(
            SystemPrompt::JokeGeneration,
            structure_part_prompt(premise, template, part_id, selections)?,
            0.8,
            500,
        ),
        AssistantTask::JokeImprovement {
            setup,
            punchline,
            direction,
        } => PromptRequest::new(
            SystemPrompt::JokeImprovement,
            improve_prompt(setup, punchline, direction),
            0.7,
            500,
        ),
        AssistantTask::JokeAnalysis {
            setup,
            punchline,
            tags,
        } => PromptRequest::new(
            SystemPrompt::JokeAnalysis,
            analyze_prompt(setup, punchline, tags),
            0.6,
            800,
        ),
        AssistantTask::TagSuggestion { setup, punchline } => PromptRequest::new(
            SystemPrompt::JokeGeneration,
            tags_prompt(setup, punchline),
            0.6,
            800,
        ),
        AssistantTask::RoutineFlow { jokes } => PromptRequest::new(
            SystemPrompt::RoutineAnalysis,
            flow_prompt(jokes),
            0.6,
            1500,
        ),
        AssistantTask::RoutineOptimization { jokes } => PromptRequest::new(
            SystemPrompt::RoutineOptimization,
            optimize_prompt(jokes),
            0.5,
            1000,
        ),
        AssistantTask::Placement { new_joke, jokes } => PromptRequest::new(
            SystemPrompt::RoutineAnalysis,
            placement_prompt(new_joke, jokes),
            0.6,
            1500,
        ),
        AssistantTask::PerformanceAnalysis { performances } => PromptRequest::new(
            SystemPrompt::PerformanceAnalysis,
            performance_prompt(performances),
            0.6,
            1200,
        ),
    };
    Ok(request)
}

fn setup_prompt(premise: &str) -> String {
    format!(
        "Based on this premise: \"{}\"\n\n\
         Generate 3 different joke setups that could lead to funny punchlines.\n\n\
         Each setup should:\n\
         - Be clear and concise\n\
         - Set up the audience's expectation\n\
         - Lead naturally to a punchline\n\
         - Be different in approach (observational, storytelling, or direct)\n\n\
         {}\n\
         [\"setup 1\", \"setup 2\", \"setup 3\"]",
        sanitize_fragment(premise),
        JSON_ARRAY
    )
}

fn punchline_prompt(setup: &str) -> String {
    format!(
        "For this joke setup: \"{}\"\n\n\
         Generate 5 different punchlines that subvert expectations and get laughs.\n\n\
         Each punchline should:\n\
         - Subvert the expectation set up by the setup\n\
         - Use comedy techniques (misdirection, exaggeration, callback, etc.)\n\
         - Be punchy and concise\n\
         - Vary in approach and style\n\n\
         {}\n\
         [\"punchline 1\", \"punchline 2\", \"punchline 3\", \"punchline 4\", \"punchline 5\"]",
        sanitize_fragment(setup),
        JSON_ARRAY
    )
}

/// Only parts that come before the target in template order give context
fn structure_part_prompt(
    premise: &str,
    template: &StructureTemplate,
    part_id: &str,
    selections: &[SelectedPartOption],
) -> Result<String, DomainError> {
    let index = template.part_index(part_id).ok_or_else(|| {
        DomainError::Validation(format!(
            "Structure '{}' has no part '{}'",
            template.id, part_id
        ))
    })?;
    let part = &template.parts[index];

    let earlier = template.parts[..index]
        .iter()
        .filter_map(|p| {
            let chosen: Vec<String> = selections
                .iter()
                .filter(|s| s.part_id == p.id)
                .flat_map(|s| s.selected.iter())
                .map(|s| sanitize_fragment(s))
                .filter(|s| !s.is_empty())
                .collect();
            (!chosen.is_empty()).then(|| format!("- {}: \"{}\"", p.label, chosen.join("\" / \"")))
        })
        .collect::<Vec<_>>();

    let context = if earlier.is_empty() {
        String::new()
    } else {
        format!("Already written:\n{}\n\n", earlier.join("\n"))
    };
    let multiple = if part.allows_multiple {
        "Several of these may be used together, so each should stand on its own.\n"
    } else {
        ""
    };

    Ok(format!(
        "Premise: \"{}\"\n\
         Structure: {} - {}\n\
         Example: \"{}\"\n\n\
         {}\
         Write 3 different options for the \"{}\" part: {}\n\
         {}\n\
         {}\n\
         [\"option 1\", \"option 2\", \"option 3\"]",
        sanitize_fragment(premise),
        template.name,
        template.summary,
        sanitize_fragment(&template.example),
        context,
        part.label,
        part.description,
        multiple,
        JSON_ARRAY
    ))
}

fn improve_prompt(setup: &str, punchline: &str, direction: &str) -> String {
    format!(
        "Current joke:\n\
         Setup: \"{}\"\n\
         Punchline: \"{}\"\n\n\
         Improvement direction: {}\n\n\
         Provide an improved version of this joke focusing on the requested direction.\n\n\
         {}\n\
         {{\n  \"setup\": \"improved setup\",\n  \"punchline\": \"improved punchline\",\n  \
         \"explanation\": \"brief explanation of changes made\"\n}}",
        sanitize_fragment(setup),
        sanitize_fragment(punchline),
        sanitize_fragment(direction),
        JSON_OBJECT
    )
}

fn analyze_prompt(setup: &str, punchline: &str, tags: &[String]) -> String {
    let tags = if tags.is_empty() {
        "none".to_string()
    } else {
        tags.iter()
            .map(|t| sanitize_fragment(t))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Analyze this joke:\n\
         Setup: \"{}\"\n\
         Punchline: \"{}\"\n\
         Tags: {}\n\n\
         Provide detailed analysis including:\n\
         1. Weaknesses in setup or punchline\n\
         2. Suggestions for improvement\n\
         3. Rating (0-100)\n\
         4. Recommended tags or toppers\n\n\
         {}\n\
         {{\n  \"weaknesses\": [\n    {{\n      \
         \"type\": \"setup-too-long\" | \"unclear-punchline\" | \"weak-tag\" | \"timing\" | \"structure\",\n      \
         \"description\": \"description\",\n      \
         \"location\": \"setup\" | \"punchline\" | \"tags\",\n      \
         \"severity\": \"low\" | \"medium\" | \"high\"\n    }}\n  ],\n  \
         \"suggestions\": [\"suggestion 1\", \"suggestion 2\"],\n  \
         \"overallScore\": 75,\n  \
         \"recommendedTags\": [\"tag 1\", \"tag 2\"]\n}}",
        sanitize_fragment(setup),
        sanitize_fragment(punchline),
        tags,
        JSON_OBJECT
    )
}

fn tags_prompt(setup: &str, punchline: &str) -> String {
    format!(
        "For this joke:\n\
         Setup: \"{}\"\n\
         Punchline: \"{}\"\n\n\
         Suggest 3-5 tags (additional punchlines that build on the main punchline).\n\n\
         Each tag should:\n\
         - Build on the previous punchline\n\
         - Escalate or pivot the joke\n\
         - Be funnier than the last\n\n\
         {}\n\
         [\"tag 1\", \"tag 2\", \"tag 3\"]",
        sanitize_fragment(setup),
        sanitize_fragment(punchline),
        JSON_ARRAY
    )
}

fn flow_prompt(jokes: &[RoutineJokeSummary]) -> String {
    let routine = jokes
        .iter()
        .enumerate()
        .map(|(i, j)| {
            format!(
                "{}. \"{}\" ({} energy, {}, {}s) [id: {}]",
                i + 1,
                sanitize_fragment(&j.title),
                j.energy,
                j.joke_type,
                j.estimated_time,
                sanitize_fragment(&j.id)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Analyze this standup routine:\n\n{}\n\n\
         Provide analysis of:\n\
         1. Flow score (0-100) - How well jokes transition\n\
         2. Energy progression - Should build up\n\
         3. Topic diversity - Avoid repetition\n\
         4. Callback opportunities - Which jokes could reference each other\n\
         5. Issues and suggestions\n\n\
         {}\n\
         {{\n  \"flowScore\": 75,\n  \"energyProgression\": [50, 60, 70, 80, 90],\n  \
         \"topicDiversity\": 80,\n  \"callbacks\": [\n    {{\n      \"jokeId1\": \"id1\",\n      \
         \"jokeId2\": \"id2\",\n      \"reason\": \"Both about flying\",\n      \"confidence\": 85,\n      \
         \"suggestedCallback\": \"Remember that thing about planes?\"\n    }}\n  ],\n  \
         \"issues\": [\n    {{\n      \
         \"type\": \"energy-drop\" | \"repetitive-topic\" | \"timing-issue\" | \"weak-opening\" | \"weak-closing\",\n      \
         \"description\": \"description\",\n      \"affectedJokeIds\": [\"id1\", \"id2\"],\n      \
         \"severity\": \"low\" | \"medium\" | \"high\"\n    }}\n  ],\n  \
         \"suggestions\": [\n    {{\n      \"type\": \"placement\" | \"callback\" | \"reorder\" | \"remove\",\n      \
         \"jokeId\": \"id\",\n      \"position\": 3,\n      \"reason\": \"Would work better here\",\n      \
         \"confidence\": 80\n    }}\n  ]\n}}",
        routine, JSON_OBJECT
    )
}

fn optimize_prompt(jokes: &[RoutineJokeSummary]) -> String {
    let routine = jokes
        .iter()
        .enumerate()
        .map(|(i, j)| {
            format!(
                "{}. ID: {}, Title: \"{}\" ({} energy, {})",
                i + 1,
                sanitize_fragment(&j.id),
                sanitize_fragment(&j.title),
                j.energy,
                j.joke_type
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Reorder these jokes for optimal routine flow:\n\n{}\n\n\
         Provide the optimal order considering:\n\
         - Strong opening (hook the audience)\n\
         - Energy progression (build up)\n\
         - Topic diversity (avoid repetition)\n\
         - Strong closing (leave them laughing)\n\
         - Callback opportunities\n\n\
         Use every ID exactly as many times as it appears above. Do not add or remove jokes.\n\n\
         {}\n\
         {{\n  \"optimizedOrder\": [\"id3\", \"id1\", \"id5\", \"id2\", \"id4\"],\n  \
         \"reasoning\": \"Explanation of why this order works better\"\n}}",
        routine, JSON_OBJECT
    )
}

fn placement_prompt(new_joke: &PlacementCandidate, jokes: &[RoutineJokeSummary]) -> String {
    let routine = jokes
        .iter()
        .enumerate()
        .map(|(i, j)| {
            format!(
                "{}. \"{}\" ({} energy, {})",
                i + 1,
                sanitize_fragment(&j.title),
                j.energy,
                j.joke_type
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Where should this new joke fit in the routine?\n\n\
         New joke: \"{}\" ({} energy, {})\n\n\
         Current routine:\n{}\n\n\
         Suggest the top 3 positions for this joke.\n\n\
         {}\n\
         {{\n  \"suggestions\": [\n    {{\n      \"position\": 0,\n      \"score\": 85,\n      \
         \"reasoning\": \"Great opener because...\",\n      \"pros\": [\"pro 1\", \"pro 2\"],\n      \
         \"cons\": [\"con 1\"]\n    }}\n  ]\n}}",
        sanitize_fragment(&new_joke.title),
        new_joke.energy,
        new_joke.joke_type,
        routine,
        JSON_OBJECT
    )
}

fn performance_prompt(performances: &[PerformanceSummary]) -> String {
    let history = performances
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{}. \"{}\" - {} ({}s) on {}",
                i + 1,
                sanitize_fragment(&p.joke_title),
                p.outcome,
                p.actual_time,
                p.date.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Analyze these performance results:\n\n{}\n\n\
         Identify:\n\
         1. Overall performance rating (0-100)\n\
         2. Strengths (what worked well)\n\
         3. Weaknesses (what needs improvement)\n\
         4. Patterns (recurring issues or successes)\n\
         5. Recommendations\n\n\
         {}\n\
         {{\n  \"overallRating\": 75,\n  \"strengths\": [\"strength 1\", \"strength 2\"],\n  \
         \"weaknesses\": [\"weakness 1\", \"weakness 2\"],\n  \"patterns\": [\n    {{\n      \
         \"pattern\": \"Longer jokes tend to bomb\",\n      \"description\": \"Jokes over 60s performed poorly\",\n      \
         \"frequency\": 5,\n      \"impact\": \"negative\"\n    }}\n  ],\n  \
         \"recommendations\": [\"recommendation 1\", \"recommendation 2\"],\n  \
         \"bestJokes\": [\"joke title 1\"],\n  \"worstJokes\": [\"joke title 2\"]\n}}",
        history, JSON_OBJECT
    )
}

const JOKE_GENERATION: &str = "You are a standup comedy writing assistant specialized in helping comedians develop jokes.

Your role:
- Help transform premises into complete jokes with setups and punchlines
- Suggest multiple variations and alternatives
- Apply comedy techniques (misdirection, rule of three, callbacks, etc.)
- Provide constructive feedback on joke structure

Guardrails:
- ONLY generate comedy content related to the user's premise or joke
- Stay within standup comedy domain
- Do not engage in general conversation
- Do not provide personal advice unrelated to comedy
- Do not discuss topics outside of comedy writing

Focus on: setups, punchlines, tags, callbacks, and comedy techniques.";

const JOKE_IMPROVEMENT: &str = "You are a standup comedy editor specialized in punching up jokes and making them funnier.

Your role:
- Analyze existing jokes for weaknesses
- Suggest improvements to setup and punchline
- Recommend additional tags or toppers
- Enhance comedic timing and structure

Guardrails:
- ONLY improve comedy content
- Focus on the specific joke provided
- Do not rewrite jokes completely unless requested
- Stay within standup comedy domain
- Do not engage in general conversation

Focus on: clarity, punchlines, timing, and comedic impact.";

const JOKE_ANALYSIS: &str = "You are a standup comedy analyst specialized in evaluating joke quality and structure.

Your role:
- Identify weaknesses in joke structure
- Evaluate setup clarity and punchline strength
- Suggest specific improvements
- Rate overall joke quality

Guardrails:
- ONLY analyze comedy content
- Provide constructive, actionable feedback
- Stay within standup comedy domain
- Do not engage in general conversation

Focus on: setup-punchline clarity, timing, structure, and comedic techniques.";

const ROUTINE_ANALYSIS: &str = "You are a standup comedy routine analyst specialized in evaluating routine flow and structure.

Your role:
- Analyze routine flow and energy progression
- Identify callback opportunities between jokes
- Evaluate topic diversity and pacing
- Suggest optimal joke placement

Guardrails:
- ONLY analyze routine structure and comedy flow
- Provide specific, actionable placement suggestions
- Stay within standup comedy domain
- Do not engage in general conversation

Focus on: flow, energy arc, callbacks, transitions, and overall routine structure.";

const ROUTINE_OPTIMIZATION: &str = "You are a standup comedy routine optimizer specialized in arranging jokes for maximum impact.

Your role:
- Suggest optimal joke order for best flow
- Maximize energy progression
- Create callback opportunities
- Ensure strong opening and closing

Guardrails:
- ONLY reorder jokes based on comedy principles
- Explain reasoning for suggested order
- Stay within standup comedy domain
- Do not add or remove jokes

Focus on: joke order, energy flow, callbacks, and audience engagement.";

const PERFORMANCE_ANALYSIS: &str = "You are a standup comedy performance analyst specialized in identifying patterns in performance data.

Your role:
- Analyze which jokes work and which don't
- Identify patterns in successful performances
- Suggest improvements based on performance history
- Provide actionable recommendations

Guardrails:
- ONLY analyze performance data and joke effectiveness
- Provide data-driven insights
- Stay within standup comedy domain
- Do not provide personal advice

Focus on: performance patterns, joke effectiveness, timing, and audience response.";
