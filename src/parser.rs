use crate::models::{Exercise, WorkoutDay, WorkoutPlan};
use tracing::{debug, warn};

/// Plan title used when the document has no usable heading and for the
/// unstructured fallback plan
pub const FALLBACK_PLAN_NAME: &str = "Custom Workout Plan";

/// Summary text used for the unstructured fallback plan
pub const FALLBACK_SUMMARY: &str = "AI-generated workout plan based on your profile";

/// Upper bound on the extracted summary, in characters
const SUMMARY_MAX_CHARS: usize = 500;

const WARMUP_LABELS: &[&str] = &["warm-up", "warmup", "warm up"];
const COOLDOWN_LABELS: &[&str] = &["cool-down", "cooldown", "cool down"];
const NOTE_LABELS: &[&str] = &["notes", "note"];
const TIP_LABELS: &[&str] = &["additional tips"];

/// Labels that terminate a warm-up or cool-down block
const BLOCK_LABELS: &[&str] = &[
    "warm-up",
    "warmup",
    "warm up",
    "cool-down",
    "cooldown",
    "cool down",
    "exercises",
    "notes",
    "note",
    "summary",
    "additional tips",
];

/// Converts free-form, AI-generated workout plan text into a structured
/// weekly schedule.
///
/// Parsing is total: any input, including empty or unrelated text, produces a
/// `WorkoutPlan`. Documents without recognizable day sections degrade to a
/// fallback plan that preserves the raw text verbatim. Each field is
/// extracted by its own small scanner, so one malformed section never spoils
/// the rest of the document.
pub struct PlanParser;

impl PlanParser {
    /// Parse raw plan text into a structured weekly schedule.
    ///
    /// `days_per_week` drives the rest-day complement; when absent, the
    /// number of parsed day sections is used instead.
    pub fn parse(raw_text: &str, days_per_week: Option<u8>) -> WorkoutPlan {
        let lines: Vec<&str> = raw_text.lines().collect();

        let markers = day_markers(&lines);
        if markers.is_empty() {
            warn!(
                input_chars = raw_text.len(),
                "no day sections recognized, returning fallback plan"
            );
            return fallback_plan(raw_text);
        }

        let title = find_title(&lines).unwrap_or_else(|| FALLBACK_PLAN_NAME.to_string());
        let summary = truncate_chars(
            &find_summary(&lines).unwrap_or_default(),
            SUMMARY_MAX_CHARS,
        );

        let mut weekly_schedule = Vec::with_capacity(markers.len());
        for (idx, &(line_idx, number, heading)) in markers.iter().enumerate() {
            let span_end = markers
                .get(idx + 1)
                .map(|&(next_idx, _, _)| next_idx)
                .unwrap_or(lines.len());
            let span = &lines[line_idx + 1..span_end];
            weekly_schedule.push(parse_day(number, heading, span));
        }

        let tips = find_tips(&lines);

        let scheduled_days = days_per_week
            .unwrap_or_else(|| u8::try_from(weekly_schedule.len()).unwrap_or(u8::MAX));
        let rest_days: Vec<u8> = (1..=7).filter(|d| *d > scheduled_days).collect();

        debug!(
            days = weekly_schedule.len(),
            exercises = weekly_schedule
                .iter()
                .map(|d: &WorkoutDay| d.exercises.len())
                .sum::<usize>(),
            tips = tips.len(),
            "plan parsed"
        );

        WorkoutPlan {
            plan_name: title.clone(),
            summary,
            full_plan: raw_text.to_string(),
            structure: title,
            weekly_schedule,
            rest_days,
            tips,
        }
    }
}

/// Minimal well-formed plan for documents the scanner cannot structure
fn fallback_plan(raw_text: &str) -> WorkoutPlan {
    WorkoutPlan {
        plan_name: FALLBACK_PLAN_NAME.to_string(),
        summary: FALLBACK_SUMMARY.to_string(),
        full_plan: raw_text.to_string(),
        structure: FALLBACK_PLAN_NAME.to_string(),
        weekly_schedule: Vec::new(),
        rest_days: Vec::new(),
        tips: Vec::new(),
    }
}

/// First level-2 heading (`##` but not `###`), stripped of decoration
fn find_title(lines: &[&str]) -> Option<String> {
    for line in lines {
        let t = line.trim();
        if t.starts_with("##") && !t.starts_with("###") {
            let title = t
                .trim_start_matches('#')
                .trim()
                .trim_matches('*')
                .trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

/// Text after a `Summary:` label, up to the next bold label, heading, or rule
fn find_summary(lines: &[&str]) -> Option<String> {
    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = match_label(line, &["summary"]) {
            let mut parts = Vec::new();
            if !rest.is_empty() {
                parts.push(rest.to_string());
            }
            for follow in &lines[i + 1..] {
                let t = follow.trim();
                if t.is_empty() {
                    continue;
                }
                if t.starts_with('#') || t.starts_with("**") || is_rule(t) {
                    break;
                }
                parts.push(t.to_string());
            }
            return Some(parts.join(" "));
        }
    }
    None
}

/// Bullet lines after an `Additional Tips:` label, up to the next heading or rule
fn find_tips(lines: &[&str]) -> Vec<String> {
    for (i, line) in lines.iter().enumerate() {
        if match_label(line, TIP_LABELS).is_some() {
            let mut tips = Vec::new();
            for follow in &lines[i + 1..] {
                let t = follow.trim();
                if t.is_empty() {
                    continue;
                }
                if is_rule(t) || t.starts_with('#') {
                    break;
                }
                if let Some(tip) = t.strip_prefix('-').or_else(|| t.strip_prefix('•')) {
                    let tip = tip.trim();
                    if !tip.is_empty() {
                        tips.push(tip.to_string());
                    }
                }
            }
            return tips;
        }
    }
    Vec::new()
}

/// All `Day <N>` marker lines: (line index, day number, heading remainder)
fn day_markers<'a>(lines: &[&'a str]) -> Vec<(usize, u8, &'a str)> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| day_marker(line).map(|(n, heading)| (i, n, heading)))
        .collect()
}

/// Recognize a `Day <N>:` marker, tolerating heading and bold decoration
fn day_marker(line: &str) -> Option<(u8, &str)> {
    let t = line.trim();
    let t = t.trim_start_matches('#').trim_start();
    let t = t.trim_start_matches('*').trim_start();

    let prefix = t.get(..3)?;
    if !prefix.eq_ignore_ascii_case("day") {
        return None;
    }
    let rest = &t[3..];
    if rest.starts_with(|c: char| c.is_alphabetic()) {
        // "days", "daylight" and similar words
        return None;
    }

    let rest = rest.trim_start();
    let digit_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    let number: u8 = rest[..digit_len].parse().ok()?;

    let mut heading = rest[digit_len..].trim_start();
    if let Some(stripped) = heading
        .strip_prefix(':')
        .or_else(|| heading.strip_prefix('-'))
        .or_else(|| heading.strip_prefix('–'))
    {
        heading = stripped;
    }
    Some((number, heading.trim()))
}

/// Parse one day's heading and body span into a `WorkoutDay`
fn parse_day(number: u8, heading: &str, span: &[&str]) -> WorkoutDay {
    let focus_raw = match heading.find('(') {
        Some(pos) => &heading[..pos],
        None => heading,
    };
    let focus = focus_raw
        .trim()
        .trim_end_matches(|c| c == '*' || c == '#')
        .trim()
        .to_string();

    let duration = parse_duration(heading);
    let warmup = label_block(span, WARMUP_LABELS);
    let cooldown = label_block(span, COOLDOWN_LABELS);

    let mut exercises: Vec<Exercise> = Vec::new();
    for line in span {
        if let Some(rest) = numbered_item(line) {
            if let Some(exercise) = parse_exercise(rest) {
                exercises.push(exercise);
            }
        } else if let Some(note) = match_label(line, NOTE_LABELS) {
            if note.is_empty() {
                continue;
            }
            // Notes attach to the most recent exercise; a note before any
            // exercise has nothing to describe and is dropped.
            if let Some(last) = exercises.last_mut() {
                if last.notes.is_empty() {
                    last.notes = note.to_string();
                } else {
                    last.notes.push_str("; ");
                    last.notes.push_str(note);
                }
            }
        }
    }

    WorkoutDay {
        day_number: number,
        day_name: format!("Day {}", number),
        focus,
        duration,
        exercises,
        warmup,
        cooldown,
    }
}

/// Duration in minutes from a `(~NN minutes)` group; 0 when absent
fn parse_duration(heading: &str) -> u32 {
    for (open, _) in heading.match_indices('(') {
        if let Some(minutes) = duration_in_parens(&heading[open + 1..]) {
            return minutes;
        }
    }
    0
}

/// Digits (optionally `~`-prefixed) closed by `)` or a `min` unit
fn duration_in_parens(inner: &str) -> Option<u32> {
    let inner = inner.trim_start();
    let inner = inner.strip_prefix('~').unwrap_or(inner).trim_start();

    let digit_len = inner.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    let minutes: u32 = inner[..digit_len].parse().ok()?;

    let after = inner[digit_len..].trim_start();
    if after.starts_with(')') {
        return Some(minutes);
    }
    let unit: String = after
        .chars()
        .take_while(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect();
    if unit.starts_with("min") {
        return Some(minutes);
    }
    None
}

/// Content of a numbered list item (`1. ...` or `1) ...`)
fn numbered_item(line: &str) -> Option<&str> {
    let t = line.trim();
    let digit_len = t.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    let after = &t[digit_len..];
    let after = after
        .strip_prefix('.')
        .or_else(|| after.strip_prefix(')'))?;
    Some(after.trim_start())
}

/// Parse a numbered exercise line into name, sets, reps, and rest
fn parse_exercise(rest: &str) -> Option<Exercise> {
    let (name, details) = split_exercise_line(rest);
    let name = name.trim().trim_end_matches(':').trim();
    if name.is_empty() {
        return None;
    }
    Some(Exercise {
        name: name.to_string(),
        sets: digits_before(details, "set").unwrap_or_default(),
        reps: find_reps(details),
        rest: find_rest_seconds(details),
        notes: String::new(),
    })
}

/// Split an exercise line into its bolded name and trailing details
fn split_exercise_line(rest: &str) -> (&str, &str) {
    if let Some(open) = rest.find("**") {
        let after = &rest[open + 2..];
        if let Some(close) = after.find("**") {
            let name = &after[..close];
            let details = after[close + 2..]
                .trim_start_matches(|c: char| c.is_whitespace() || c == '-' || c == '–' || c == ':');
            return (name, details);
        }
    }
    for sep in [" - ", " – ", ": "] {
        if let Some(pos) = rest.find(sep) {
            return (&rest[..pos], rest[pos + sep.len()..].trim_start());
        }
    }
    (rest, "")
}

/// Digit run immediately preceding `keyword` ("4 sets" -> "4")
fn digits_before(text: &str, keyword: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find(keyword) {
        let at = from + pos;
        let after = at + keyword.len();
        // Word boundary: reject "preset", allow the plural "sets"
        let after_ok = match lower.as_bytes().get(after) {
            Some(b) => !b.is_ascii_alphabetic() || *b == b's',
            None => true,
        };
        if after_ok {
            let digits: String = text[..at]
                .trim_end()
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .chars()
                .rev()
                .collect();
            if !digits.is_empty() {
                return Some(digits);
            }
        }
        from = after;
    }
    None
}

/// Repetition count or range after an `x`/`×` marker ("x 8-10" -> "8-10")
fn find_reps(details: &str) -> String {
    let chars: Vec<(usize, char)> = details.char_indices().collect();
    for i in 0..chars.len() {
        let c = chars[i].1;
        if c != 'x' && c != 'X' && c != '×' {
            continue;
        }
        // Reject the x inside words like "max"; "3x12" stays valid
        if i > 0 && chars[i - 1].1.is_alphabetic() {
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && chars[j].1.is_whitespace() {
            j += 1;
        }
        let start = j;
        while j < chars.len() && chars[j].1.is_ascii_digit() {
            j += 1;
        }
        if j == start {
            continue;
        }
        if j < chars.len() && (chars[j].1 == '-' || chars[j].1 == '–') {
            let mut k = j + 1;
            while k < chars.len() && chars[k].1.is_ascii_digit() {
                k += 1;
            }
            if k > j + 1 {
                j = k;
            }
        }
        let end = chars.get(j).map(|&(idx, _)| idx).unwrap_or(details.len());
        return details[chars[start].0..end].to_string();
    }
    String::new()
}

/// Rest duration normalized to "<n> seconds"; empty when not found
fn find_rest_seconds(details: &str) -> String {
    let lower = details.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut from = 0;
    while let Some(pos) = lower[from..].find("rest") {
        let at = from + pos;
        let after = at + 4;
        let start_ok = at == 0 || !bytes[at - 1].is_ascii_alphabetic();
        let end_ok = bytes.get(after).map_or(true, |b| !b.is_ascii_alphabetic());
        if start_ok && end_ok {
            let tail = details[after..]
                .trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '-' || c == '=');
            let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                let unit: String = tail[digits.len()..]
                    .trim_start()
                    .chars()
                    .take_while(|c| c.is_alphabetic())
                    .flat_map(|c| c.to_lowercase())
                    .collect();
                if unit.is_empty() || unit.starts_with('s') {
                    return format!("{} seconds", digits);
                }
            }
        }
        from = after;
    }
    String::new()
}

/// Labeled block (warm-up, cool-down): label-line remainder plus following
/// plain lines, joined with spaces
fn label_block(span: &[&str], names: &[&str]) -> String {
    for (i, line) in span.iter().enumerate() {
        if let Some(rest) = match_label(line, names) {
            let mut parts = Vec::new();
            if !rest.is_empty() {
                parts.push(rest.to_string());
            }
            for follow in &span[i + 1..] {
                let t = follow.trim();
                if t.is_empty() {
                    continue;
                }
                if is_block_boundary(t) {
                    break;
                }
                parts.push(t.to_string());
            }
            return parts.join(" ");
        }
    }
    String::new()
}

fn is_block_boundary(trimmed: &str) -> bool {
    trimmed.starts_with('#')
        || trimmed.starts_with("**")
        || is_rule(trimmed)
        || numbered_item(trimmed).is_some()
        || day_marker(trimmed).is_some()
        || match_label(trimmed, BLOCK_LABELS).is_some()
}

/// Match a known label at the start of a line, tolerating heading, bullet,
/// and bold decoration; returns the text after the label
fn match_label<'a>(line: &'a str, names: &[&str]) -> Option<&'a str> {
    let t = strip_decoration(line);
    for name in names {
        let prefix = match t.get(..name.len()) {
            Some(prefix) => prefix,
            None => continue,
        };
        if !prefix.eq_ignore_ascii_case(name) {
            continue;
        }
        let after = &t[name.len()..];
        if after.starts_with(|c: char| c.is_alphanumeric()) {
            continue;
        }
        return Some(
            after
                .trim_start_matches(|c: char| c == '*' || c == ':')
                .trim(),
        );
    }
    None
}

/// Strip leading heading markers, bullets, and bold asterisks
fn strip_decoration(line: &str) -> &str {
    let mut t = line.trim();
    loop {
        let before = t;
        t = t.trim_start_matches('#').trim_start();
        if let Some(stripped) = t.strip_prefix("- ").or_else(|| t.strip_prefix("• ")) {
            t = stripped.trim_start();
        }
        t = t.trim_start_matches('*').trim_start();
        if t == before {
            return t;
        }
    }
}

/// Horizontal rule: three or more of the same `-`, `*`, or `_`
fn is_rule(trimmed: &str) -> bool {
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && (compact.chars().all(|c| c == '-')
            || compact.chars().all(|c| c == '*')
            || compact.chars().all(|c| c == '_'))
}

/// Truncate to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
