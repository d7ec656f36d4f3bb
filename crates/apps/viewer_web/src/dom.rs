//! Applies controller effects to the page.
//!
//! Element ids are the contract with `www/index.html`.

use quiz::{Feedback, Question, QuizStats};
use runtime::{UiEffect, UiUpdate};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

const HIDDEN: &str = "hidden";
const OPTION_INPUT_NAME: &str = "star-name";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn by_id(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

fn set_visible(doc: &Document, id: &str, visible: bool) -> Result<(), JsValue> {
    let classes = by_id(doc, id)?.class_list();
    if visible {
        classes.remove_1(HIDDEN)
    } else {
        classes.add_1(HIDDEN)
    }
}

fn set_text(doc: &Document, id: &str, text: &str) -> Result<(), JsValue> {
    by_id(doc, id)?.set_text_content(Some(text));
    Ok(())
}

fn alert(msg: &str) -> Result<(), JsValue> {
    match web_sys::window() {
        Some(w) => w.alert_with_message(msg),
        None => Ok(()),
    }
}

/// Id of the checked answer radio, if any.
pub fn selected_option(doc: &Document) -> Result<Option<i64>, JsValue> {
    let selector = format!("input[name=\"{OPTION_INPUT_NAME}\"]:checked");
    let Some(el) = doc.query_selector(&selector)? else {
        return Ok(None);
    };
    let input: HtmlInputElement = el.dyn_into()?;
    Ok(input.value().parse::<i64>().ok())
}

fn show_question(doc: &Document, question: &Question) -> Result<(), JsValue> {
    let container = by_id(doc, "quiz-options")?;
    container.set_inner_html("");

    for option in &question.options {
        let label = doc.create_element("label")?;
        let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
        input.set_type("radio");
        input.set_name(OPTION_INPUT_NAME);
        input.set_value(&option.id.to_string());
        label.append_with_node_1(&input)?;
        // Text node, not markup: names come from the data file.
        label.append_with_str_1(&option.name)?;
        container.append_with_node_1(&label)?;
    }

    set_visible(doc, "quiz-popup", true)
}

fn show_feedback(doc: &Document, feedback: &Feedback) -> Result<(), JsValue> {
    let icon = by_id(doc, "feedback-icon")?;
    let text = by_id(doc, "feedback-text")?;
    let (glyph, class, message) = if feedback.is_correct {
        ("\u{2713}", "correct", "Correct!".to_string())
    } else {
        (
            "\u{2717}",
            "incorrect",
            format!(
                "Incorrect. The correct answer was {}",
                feedback.correct_name
            ),
        )
    };
    icon.set_text_content(Some(glyph));
    icon.set_class_name(class);
    text.set_text_content(Some(&message));
    text.set_class_name(class);
    set_visible(doc, "feedback-popup", true)
}

fn update_stats(doc: &Document, stats: QuizStats, prefix: &str) -> Result<(), JsValue> {
    set_text(doc, &format!("{prefix}answered"), &stats.answered.to_string())?;
    set_text(doc, &format!("{prefix}correct"), &stats.correct.to_string())?;
    set_text(
        doc,
        &format!("{prefix}success-rate"),
        &format!("{}%", stats.success_rate()),
    )
}

/// Applies every non-redraw effect in order. Redraws are the caller's job.
pub fn apply(doc: &Document, update: &UiUpdate) -> Result<(), JsValue> {
    for effect in &update.effects {
        match effect {
            UiEffect::Redraw => {}
            UiEffect::ShowQuestion(q) => show_question(doc, q)?,
            UiEffect::HideQuestion => set_visible(doc, "quiz-popup", false)?,
            UiEffect::ShowFeedback(fb) => show_feedback(doc, fb)?,
            UiEffect::HideFeedback => set_visible(doc, "feedback-popup", false)?,
            UiEffect::Prompt(msg) | UiEffect::Notice(msg) => alert(msg)?,
            UiEffect::UpdateStats(stats) => update_stats(doc, *stats, "")?,
            UiEffect::ShowResults(stats) => {
                update_stats(doc, *stats, "final-")?;
                set_visible(doc, "results-popup", true)?;
            }
            UiEffect::HideResults => set_visible(doc, "results-popup", false)?,
        }
    }
    Ok(())
}
