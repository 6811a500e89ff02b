//! Structure catalog - The fixed set of joke-construction templates
//!
//! 21 templates in 6 categories. The catalog is read-only.

use std::sync::LazyLock;

use crate::domain::entities::{
    JokeStructureSelection, NewJoke, SelectedPartOption, StructureCategory, StructurePart,
    StructurePartSelection, StructureTemplate,
};
use crate::domain::errors::DomainError;

type PartRow = (&'static str, &'static str, &'static str, bool);

fn template(
    id: &str,
    name: &str,
    category: &str,
    example: &str,
    summary: &str,
    parts: &[PartRow],
) -> StructureTemplate {
    StructureTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        summary: summary.to_string(),
        example: example.to_string(),
        parts: parts
            .iter()
            .map(|(id, label, description, allows_multiple)| StructurePart {
                id: id.to_string(),
                label: label.to_string(),
                description: description.to_string(),
                allows_multiple: *allows_multiple,
            })
            .collect(),
    }
}

static CATEGORIES: LazyLock<Vec<StructureCategory>> = LazyLock::new(|| {
    [
        ("core", "Core Blueprints", "Foundational joke patterns"),
        ("wordplay", "Wordplay & Language", "Puns, double meanings, word flips"),
        ("comparison", "Comparison Engines", "Analogies, exaggeration, contrast"),
        ("narrative", "Narrative & Timing", "Story-based structures"),
        ("call-response", "Call-and-Response", "Question-answer formats"),
        ("topper", "Topper", "Stacking multiple punchlines"),
    ]
    .into_iter()
    .map(|(id, name, description)| StructureCategory {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
});

static TEMPLATES: LazyLock<Vec<StructureTemplate>> = LazyLock::new(|| {
    vec![
        // Core
        template(
            "setup-punchline-incongruity",
            "Setup → Punchline (Incongruity)",
            "core",
            "I told my trainer I want abs by summer. He said, 'Try Photoshop.'",
            "Classic structure: establish normal world, deliver surprising twist.",
            &[
                ("setup", "Setup", "Frame the premise and establish the expectation.", false),
                ("punchline", "Punchline", "Deliver the incongruous twist that subverts the expectation.", false),
            ],
        ),
        template(
            "rule-of-three",
            "Rule of Three (A, B, Surprise-C)",
            "core",
            "My diet has three phases: denial, bargaining, and… tacos.",
            "Two similar beats establish a pattern; third breaks it.",
            &[
                ("beat-a", "Beat A", "First item that establishes the pattern.", false),
                ("beat-b", "Beat B", "Second item that reinforces the pattern.", false),
                ("surprise-c", "Surprise C", "Third item that breaks the pattern for the laugh.", false),
            ],
        ),
        template(
            "misdirection-paraprosdokian",
            "Misdirection / Paraprosdokian",
            "core",
            "I have the body of a god—unfortunately, it's in my freezer.",
            "Lead the audience to one meaning; reveal a second.",
            &[
                ("garden-path", "Garden Path Setup", "Lead the audience toward one expected meaning.", false),
                ("reveal", "Twist Reveal", "Reveal the unexpected second meaning.", false),
            ],
        ),
        template(
            "premise-angle-actout-tags",
            "Premise → Angle → Act-Out → Tags",
            "core",
            "Group chats feel like meetings. Except nobody reads the agenda. (glancing at phone) 'Any updates?' … 'Yes—memes.' Minutes will be published as screenshots.",
            "Full premise with fresh angle, acted moment, and quick tags.",
            &[
                ("premise", "Premise", "Topic + opinion or observation.", false),
                ("angle", "Angle", "Fresh perspective or comparison.", false),
                ("actout", "Act-Out", "Brief acted moment or character voice.", false),
                ("tags", "Tags", "Quick extra punchlines; multiple allowed.", true),
            ],
        ),
        template(
            "plant-and-payoff",
            "Plant & Payoff (Call-forward)",
            "core",
            "Mention your fear of geese early; 10 minutes later your 'heroic escape' is foiled… by a goose.",
            "Plant a detail early; cash it in later with a twist.",
            &[
                ("plant", "Plant", "Establish a detail early that seems innocuous.", false),
                ("bridge", "Bridge Content", "Middle material that doesn't reference the plant.", false),
                ("payoff", "Payoff", "Call back to the plant with a twist for big laugh.", false),
            ],
        ),
        template(
            "callback",
            "Callback",
            "core",
            "At least it wasn't the goose again.",
            "Refer back to an earlier joke; the memory itself becomes the punch.",
            &[
                ("original-reference", "Original Reference", "Reference to an earlier joke or bit in the set.", false),
                ("callback-line", "Callback Line", "The line that triggers the memory and gets the laugh.", false),
            ],
        ),
        // Wordplay
        template(
            "pun-double-entendre",
            "Pun / Double Entendre",
            "wordplay",
            "I'd tell you a construction joke, but I'm still working on it.",
            "One word, two meanings.",
            &[("dual-meaning-line", "Dual Meaning Line", "The punchline where one word carries two meanings.", false)],
        ),
        template(
            "ambiguity-resolve",
            "Ambiguity Resolve (Definition Flip)",
            "wordplay",
            "'Clean eating' means wiping crumbs off the pizza box first.",
            "Redefine a common term unexpectedly.",
            &[
                ("common-term", "Common Term", "Introduce the term everyone knows.", false),
                ("redefinition", "Redefinition", "Twist the meaning in an unexpected way.", false),
            ],
        ),
        template(
            "malapropism",
            "Malapropism / Misheard Word",
            "wordplay",
            "I have a 'gluten-free' relationship—no bread, just toast.",
            "Use a near-sound-alike for a silly meaning.",
            &[
                ("expected-phrase", "Expected Phrase", "Set up the phrase the audience expects.", false),
                ("sound-alike-twist", "Sound-Alike Twist", "Replace with a similar-sounding phrase for absurd effect.", false),
            ],
        ),
        template(
            "spoonerism",
            "Spoonerism / Word Swap",
            "wordplay",
            "Bunny rusiness is booming.",
            "Swap initial sounds to create a comic error.",
            &[
                ("original-phrase", "Original Phrase", "The correct phrase.", false),
                ("swapped-version", "Swapped Version", "The phrase with initial sounds swapped.", false),
            ],
        ),
        // Comparison
        template(
            "analogy-metaphor",
            "Analogy / Extended Metaphor",
            "comparison",
            "Dating apps are slot machines that pay out… conversations.",
            "Explain A by comparing it to B (absurdly accurate).",
            &[
                ("thing-a", "Thing A", "The actual subject you're describing.", false),
                ("comparison-b", "Absurd Comparison to B", "The unexpected comparison that illuminates A.", false),
            ],
        ),
        template(
            "exaggeration-hyperbole",
            "Exaggeration (Hyperbole) / Understatement",
            "comparison",
            "I waited so long my phone aged out of updates. (hyperbole) OR The rent is… noticeable. (understatement)",
            "Amplify or minimize for comic effect.",
            &[
                ("normal-situation", "Normal Situation", "The baseline reality.", false),
                ("exaggerated-outcome", "Exaggerated/Understated Outcome", "The wildly amplified or minimized result.", false),
            ],
        ),
        template(
            "juxtaposition-contrast",
            "Juxtaposition / Contrast",
            "comparison",
            "My smartwatch congratulates me for standing. My landlord congratulates me for paying.",
            "Place opposites together to reveal absurdity.",
            &[
                ("opposite-a", "Opposite A", "First contrasting element.", false),
                ("opposite-b", "Opposite B", "Second contrasting element that highlights the absurdity.", false),
            ],
        ),
        // Narrative
        template(
            "story-with-button",
            "Story with Button",
            "narrative",
            "…and that's when I learned my 'smart' fridge is smarter than my therapist.",
            "Tell a short story; the button is a crisp final punch.",
            &[
                ("story-setup", "Story Setup", "Establish the scene and characters.", false),
                ("story-build", "Story Build", "Develop the narrative tension.", false),
                ("button", "Button (Final Punch)", "Crisp one-line payoff that closes the story.", false),
            ],
        ),
        template(
            "list-escalation",
            "List Escalation",
            "narrative",
            "My morning routine: gratitude, green juice, and pretending my inbox is a rumor.",
            "Rattle off items that heighten in silliness; final item is the biggest turn.",
            &[
                ("items-1-2", "Items 1-2", "First reasonable items that establish pattern.", false),
                ("items-3-4", "Items 3-4 (Optional)", "Heighten the absurdity slightly.", false),
                ("final-twist", "Final Twist Item", "The biggest, most absurd turn.", false),
            ],
        ),
        template(
            "shaggy-dog",
            "Shaggy Dog (Long Build, Anticlimax)",
            "narrative",
            "A five-minute epic that ends: 'So… free parking.'",
            "Comically long setup, deliberately tiny or sideways payoff.",
            &[
                ("long-setup", "Long Setup", "Extended narrative with many details.", false),
                ("more-setup", "More Setup", "Continue building anticipation.", false),
                ("tiny-payoff", "Tiny Payoff", "Deliberately underwhelming or sideways conclusion.", false),
            ],
        ),
        template(
            "anti-joke-meta",
            "Anti-Joke / Meta",
            "narrative",
            "This is a joke about subverting expectations. (pause) That's it.",
            "Avoid the expected punch; call out the structure itself.",
            &[
                ("expected-setup", "Expected Setup", "Begin like a traditional joke.", false),
                ("subverted-punchline", "Subverted/Meta Punchline", "Avoid the punch or comment on the joke structure itself.", false),
            ],
        ),
        template(
            "one-liner",
            "One-Liner",
            "narrative",
            "I'm on a seafood diet—I see food, and it's eight dollars more than last week.",
            "Premise and punch fused into a single tight sentence.",
            &[("complete-joke", "Complete Joke", "The entire joke in one concise sentence: premise + punch.", false)],
        ),
        // Call-and-response
        template(
            "riddle-qa",
            "Riddle / Q&A",
            "call-response",
            "Why did the developer cross the road? To get to the other side effects.",
            "Question tees up a hidden meaning.",
            &[
                ("question", "Question", "The setup question that primes the audience.", false),
                ("answer-twist", "Answer with Twist", "The answer that reveals the hidden meaning or pun.", false),
            ],
        ),
        template(
            "knock-knock",
            "Knock-Knock",
            "call-response",
            "Knock knock. Who's there? Interrupting cow. Interrupting cow w— MOOO!",
            "Classic call-and-response pun vehicle. Works best for kids' humor or deliberate retro/meta bits.",
            &[
                ("knock-setup", "Knock Setup", "The 'Knock knock' and 'Who's there?' exchange.", false),
                ("whos-there-exchange", "Who's There Exchange", "The name/phrase response.", false),
                ("pun-punchline", "Pun Punchline", "The final '[Name] who?' response with the pun payoff.", false),
            ],
        ),
        // Topper
        template(
            "topper-tag-stacking",
            "Topper / Tag Stacking",
            "topper",
            "I meditate daily. It's like napping, but with branding. With candles. And an app subscription.",
            "Punchline lands → add 1–3 shorter punches that escalate.",
            &[
                ("main-punchline", "Main Punchline", "The primary joke that gets the first laugh.", false),
                ("tag-1-2", "Tags 1-2", "Quick follow-up punches that build on the main joke.", true),
                ("tag-3-plus", "Tags 3+", "Additional escalating tags; multiple allowed.", true),
            ],
        ),
    ]
});

pub fn categories() -> &'static [StructureCategory] {
    &CATEGORIES
}

pub fn all() -> &'static [StructureTemplate] {
    &TEMPLATES
}

pub fn find(id: &str) -> Option<&'static StructureTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn find_category(id: &str) -> Option<&'static StructureCategory> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn by_category(category: &str) -> Vec<&'static StructureTemplate> {
    TEMPLATES.iter().filter(|t| t.category == category).collect()
}

/// Turn part selections into a new joke.
///
/// The first pick of the first part becomes the setup and the last pick of the last part the
/// punchline. Every pick is appended to the notes in template order.
pub fn build_joke(
    template: &StructureTemplate,
    title: &str,
    selections: &[SelectedPartOption],
    notes: Option<&str>,
) -> Result<NewJoke, DomainError> {
    let parts: Vec<StructurePartSelection> = template
        .parts
        .iter()
        .map(|part| {
            let selection = selections.iter().find(|s| s.part_id == part.id);
            StructurePartSelection {
                part_id: part.id.clone(),
                label: part.label.clone(),
                selected: selection
                    .map(|s| {
                        s.selected
                            .iter()
                            .map(|v| v.trim().to_string())
                            .filter(|v| !v.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
                custom_inputs: selection
                    .and_then(|s| s.custom_inputs.clone())
                    .filter(|c| !c.is_empty()),
            }
        })
        .collect();

    let setup = parts.first().and_then(|p| p.selected.first()).cloned();
    let punchline = parts.last().and_then(|p| p.selected.last()).cloned();
    let (Some(setup), Some(punchline)) = (setup, punchline) else {
        return Err(DomainError::Validation(
            "The first and last parts need a selection".to_string(),
        ));
    };
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("Title is required".to_string()));
    }

    let flattened = parts
        .iter()
        .flat_map(|p| p.selected.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n");
    let header = notes.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("");
    let notes = format!("{}\n\nStructure Parts:\n{}", header, flattened)
        .trim()
        .to_string();

    Ok(NewJoke {
        title: title.to_string(),
        setup,
        punchline,
        notes: Some(notes),
        structure: Some(JokeStructureSelection {
            structure_id: template.id.clone(),
            structure_name: template.name.clone(),
            parts,
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(all().len(), 21);
        assert_eq!(categories().len(), 6);

        let ids: HashSet<_> = all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 21);

        for template in all() {
            assert!(find_category(&template.category).is_some(), "{}", template.id);
            assert!(!template.parts.is_empty(), "{}", template.id);
        }
    }

    #[test]
    fn test_category_counts() {
        let counts: Vec<_> = categories()
            .iter()
            .map(|c| by_category(&c.id).len())
            .collect();
        assert_eq!(counts, vec![6, 4, 3, 5, 2, 1]);
        assert!(by_category("nope").is_empty());
    }

    #[test]
    fn test_find() {
        let topper = find("topper-tag-stacking").unwrap();
        assert!(topper.part("tag-3-plus").unwrap().allows_multiple);
        assert!(!topper.part("main-punchline").unwrap().allows_multiple);
        assert!(find("missing").is_none());
    }

    #[test]
    fn test_build_joke_from_rule_of_three() {
        let template = find("rule-of-three").unwrap();
        let selections = vec![
            SelectedPartOption {
                part_id: "beat-a".into(),
                selected: vec!["denial".into()],
                custom_inputs: None,
            },
            SelectedPartOption {
                part_id: "beat-b".into(),
                selected: vec!["bargaining".into()],
                custom_inputs: Some(vec!["bargaining".into()]),
            },
            SelectedPartOption {
                part_id: "surprise-c".into(),
                selected: vec!["nachos".into(), "tacos".into()],
                custom_inputs: None,
            },
        ];

        let joke = build_joke(template, "  Diet phases ", &selections, Some("From the diet premise")).unwrap();
        assert_eq!(joke.title, "Diet phases");
        assert_eq!(joke.setup, "denial");
        assert_eq!(joke.punchline, "tacos");
        assert_eq!(
            joke.notes.as_deref(),
            Some("From the diet premise\n\nStructure Parts:\ndenial\nbargaining\nnachos\ntacos")
        );

        let structure = joke.structure.unwrap();
        assert_eq!(structure.structure_id, "rule-of-three");
        assert_eq!(structure.parts.len(), 3);
        assert_eq!(structure.parts[1].custom_inputs, Some(vec!["bargaining".to_string()]));
    }

    #[test]
    fn test_build_joke_requires_first_and_last() {
        let template = find("callback").unwrap();
        let selections = vec![SelectedPartOption {
            part_id: "original-reference".into(),
            selected: vec!["the goose".into()],
            custom_inputs: None,
        }];
        let result = build_joke(template, "Goose", &selections, None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_build_joke_without_notes() {
        let template = find("one-liner").unwrap();
        let selections = vec![SelectedPartOption {
            part_id: "complete-joke".into(),
            selected: vec!["I'm on a seafood diet.".into()],
            custom_inputs: None,
        }];
        let joke = build_joke(template, "Seafood", &selections, None).unwrap();
        assert_eq!(joke.setup, joke.punchline);
        assert_eq!(
            joke.notes.as_deref(),
            Some("Structure Parts:\nI'm on a seafood diet.")
        );
    }
}
