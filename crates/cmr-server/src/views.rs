//! HTML pages for the prediction form.
//!
//! Pages are emitted through `quick_xml::Writer`, so every piece of
//! user-supplied text is escaped on the way out.

use std::io::{self, Write};

use cmr_model::{Condition, PredictionResult};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

pub const FORM_TITLE: &str = "Diabetes Prediction";
pub const RESULTS_TITLE: &str = "Prediction Results";

/// Form fields in display order: (name, label, input type).
const FORM_FIELDS: [(&str, &str, &str); 4] = [
    ("name", "Name:", "text"),
    ("insulin", "Insulin Level:", "number"),
    ("glucose", "Glucose Level:", "number"),
    ("blood_pressure", "Blood Pressure Level:", "number"),
];

/// The input form served on `GET /`.
pub fn render_form() -> io::Result<String> {
    render_page(FORM_TITLE, |html| {
        text_element(html, "h1", "Diabetes Prediction Form")?;
        let mut form = BytesStart::new("form");
        form.push_attribute(("method", "POST"));
        html.write_event(Event::Start(form))?;
        for (name, label, kind) in FORM_FIELDS {
            let mut label_start = BytesStart::new("label");
            label_start.push_attribute(("for", name));
            html.write_event(Event::Start(label_start))?;
            html.write_event(Event::Text(BytesText::new(label)))?;
            html.write_event(Event::End(BytesEnd::new("label")))?;

            let mut input = BytesStart::new("input");
            input.push_attribute(("type", kind));
            input.push_attribute(("id", name));
            input.push_attribute(("name", name));
            if kind == "number" {
                input.push_attribute(("step", "any"));
            }
            input.push_attribute(("required", "required"));
            html.write_event(Event::Empty(input))?;
            html.write_event(Event::Empty(BytesStart::new("br")))?;
            html.write_event(Event::Empty(BytesStart::new("br")))?;
        }
        let mut submit = BytesStart::new("input");
        submit.push_attribute(("type", "submit"));
        submit.push_attribute(("value", "Submit"));
        html.write_event(Event::Empty(submit))?;
        html.write_event(Event::End(BytesEnd::new("form")))?;
        Ok(())
    })
}

/// The results listing served after a successful `POST /`.
pub fn render_results(name: &str, predictions: &PredictionResult) -> io::Result<String> {
    render_page(RESULTS_TITLE, |html| {
        text_element(html, "h1", &format!("Prediction Results for {name}"))?;
        for entry in predictions.iter() {
            text_element(html, "h2", entry.model.display_name())?;
            for condition in Condition::ALL {
                let answer = entry.labels.get(condition).answer();
                text_element(html, "p", &format!("{condition}: {answer}"))?;
            }
        }
        back_link(html)
    })
}

/// A minimal page for rejected or failed requests.
pub fn render_error(heading: &str, message: &str) -> io::Result<String> {
    render_page(heading, |html| {
        text_element(html, "h1", heading)?;
        text_element(html, "p", message)?;
        back_link(html)
    })
}

fn render_page<F>(title: &str, body: F) -> io::Result<String>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> io::Result<()>,
{
    let mut html = Writer::new_with_indent(Vec::new(), b' ', 4);
    html.write_event(Event::DocType(BytesText::from_escaped("html")))?;

    let mut root = BytesStart::new("html");
    root.push_attribute(("lang", "en"));
    html.write_event(Event::Start(root))?;

    html.write_event(Event::Start(BytesStart::new("head")))?;
    let mut charset = BytesStart::new("meta");
    charset.push_attribute(("charset", "UTF-8"));
    html.write_event(Event::Empty(charset))?;
    let mut viewport = BytesStart::new("meta");
    viewport.push_attribute(("name", "viewport"));
    viewport.push_attribute(("content", "width=device-width, initial-scale=1.0"));
    html.write_event(Event::Empty(viewport))?;
    text_element(&mut html, "title", title)?;
    html.write_event(Event::End(BytesEnd::new("head")))?;

    html.write_event(Event::Start(BytesStart::new("body")))?;
    body(&mut html)?;
    html.write_event(Event::End(BytesEnd::new("body")))?;
    html.write_event(Event::End(BytesEnd::new("html")))?;

    let mut bytes = html.into_inner();
    bytes.write_all(b"\n")?;
    String::from_utf8(bytes).map_err(io::Error::other)
}

fn text_element<W: Write>(html: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    html.write_event(Event::Start(BytesStart::new(name)))?;
    html.write_event(Event::Text(BytesText::new(text)))?;
    html.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn back_link<W: Write>(html: &mut Writer<W>) -> io::Result<()> {
    let mut link = BytesStart::new("a");
    link.push_attribute(("href", "/"));
    html.write_event(Event::Start(link))?;
    html.write_event(Event::Text(BytesText::new("Go Back")))?;
    html.write_event(Event::End(BytesEnd::new("a")))?;
    Ok(())
}
