// Framing applied around every stage's task text before it reaches the generator.
// Replace: {role}, {goal}, {backstory}, {task}, {expected_output}

pub const STAGE_PROMPT_TEMPLATE: &str = "You are the {role}.
Your goal: {goal}
Background: {backstory}

TASK:
{task}

EXPECTED OUTPUT:
{expected_output}

Respond with the expected output only, as plain text.";

/// Substitutes `{key}` placeholders in one pass.
///
/// Substituted values are never rescanned, so document text containing braces
/// passes through untouched. Unknown placeholders are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
