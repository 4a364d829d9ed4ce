//! Shame message prompt

use brief_domain::{EscalationLevel, TeamMember};
use rand::seq::SliceRandom;
use rand::Rng;

const THEME_PLACEHOLDER: &str = "{THEME_SUGGESTION}";

/// System-style instructions for the reminder message
pub const SHAME_PROMPT: &str = r#"You are the Brief Reminder Bot, a film-and-TV-obsessed assistant who reminds engineers to submit their weekly updates.

CONTEXT:
- Deadline: Monday 9:00 AM UK time
- Channel: Slack (startup, CEO is watching)
- Tone: playful shame, not mean. A friendly roast, never an HR complaint

YOUR TASK:
Write a single Slack reminder message that:
1. Opens with a film/TV reference about deadlines, updates, accountability or Mondays
2. Lists the delinquent team members exactly as given
3. Reminds them the deadline is Monday 9am
4. Ends with a punchy one-liner

{THEME_SUGGESTION}

ESCALATION LEVELS:
- GENTLE (Friday afternoon): friendly reminder, light humour
- MEDIUM (Sunday evening): more urgent, theatrical disappointment
- FULL_ROAST (Monday morning): maximum drama, all caps allowed, guilt-tripping encouraged

FORMAT:
Only the Slack message, nothing else. Use *bold* for emphasis and keep it under 400 characters."#;

/// Film and TV franchises the bot may riff on
pub const REFERENCE_THEMES: &[&str] = &[
    "Game of Thrones",
    "Terminator",
    "The Matrix",
    "Jaws",
    "Star Wars",
    "The Office",
    "Breaking Bad",
    "Lord of the Rings",
    "Pulp Fiction",
    "The Godfather",
    "Top Gun",
    "Forrest Gump",
    "The Shining",
    "Apollo 13",
    "Jerry Maguire",
    "A Few Good Men",
    "Anchorman",
    "Airplane",
    "Dirty Harry",
    "Taxi Driver",
    "Apocalypse Now",
    "James Bond",
    "Harry Potter",
    "Field of Dreams",
    "The Sixth Sense",
    "Scarface",
    "The Graduate",
    "Taken",
    "The Dark Knight",
    "Jurassic Park",
    "Mean Girls",
    "Ghostbusters",
    "Braveheart",
    "Rocky",
    "The Wizard of Oz",
    "22 Jump Street",
    "Snakes on a Plane",
    "Whiplash",
    "Meet the Parents",
    "Captain Phillips",
    "Borat",
    "Shrek",
    "Fight Club",
    "Superbad",
    "Step Brothers",
    "The Big Lebowski",
];

/// Random reference theme for the roast.
pub fn pick_theme<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    REFERENCE_THEMES.choose(rng).copied().unwrap_or("The Office")
}

/// Fill the prompt with the theme hint, level and delinquent list.
pub fn build_shame_prompt(theme: &str, level: EscalationLevel, delinquents: &[&TeamMember]) -> String {
    let hint = format!(
        "Suggested theme for this message: \"{theme}\" (use it or pick another, just don't repeat recent ones)."
    );
    let list = delinquents
        .iter()
        .map(|member| format!("• {} ({})", member.name, member.email))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nCURRENT ESCALATION LEVEL: {level}\nDELINQUENT TEAM MEMBERS:\n{list}\n\nGenerate the shame message now:",
        SHAME_PROMPT.replace(THEME_PLACEHOLDER, &hint)
    )
}
