// Row rendering
//
// Builds a substitution context from one data row and one template's
// resolved binding, then delegates placeholder substitution to a
// TemplateRenderer. Pure: no side effects beyond the delegate.

use crate::binding::ResolvedBinding;
use crate::data::DataRow;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Placeholder substitution delegate
///
/// Receives the raw template bytes and a placeholder -> value map and
/// returns rendered bytes. Extra values the template never mentions are
/// tolerated; a placeholder the template declares but the map does not
/// supply is the delegate's error.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &[u8], values: &BTreeMap<String, String>) -> Result<Vec<u8>>;
}

/// Default renderer: treats the template as UTF-8 text with
/// {{placeholder}} fields and renders it through Tera
#[derive(Debug, Default)]
pub struct TeraRenderer;

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &[u8], values: &BTreeMap<String, String>) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(template)
            .map_err(|e| Error::render(format!("template is not valid UTF-8: {}", e)))?;

        let mut context = tera::Context::new();
        for (name, value) in values {
            context.insert(name, value);
        }

        let rendered = tera::Tera::one_off(text, &context, false)
            .map_err(|e| Error::Template(describe_tera_error(e)))?;
        Ok(rendered.into_bytes())
    }
}

/// Tera names the offending variable in the error's source chain, not in
/// the top-level message; collect the whole chain so a render failure
/// tells the user which placeholder had no value.
fn describe_tera_error(err: tera::Error) -> String {
    use std::error::Error as _;
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Renders one (row, template) pair using a resolved binding
pub struct RowRenderer<'a> {
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> RowRenderer<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Render a row against a template
    pub fn render(
        &self,
        row: &DataRow,
        template: &[u8],
        binding: &ResolvedBinding,
    ) -> Result<Vec<u8>> {
        let values = build_context(row, binding)?;
        self.renderer.render(template, &values)
    }
}

/// Build the substitution context for one row
///
/// Every bound placeholder must find its column in the row; a missing
/// column is surfaced, never silently defaulted.
pub fn build_context(row: &DataRow, binding: &ResolvedBinding) -> Result<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();
    for (placeholder, column) in &binding.placeholders {
        let value = row.require(column)?;
        values.insert(placeholder.clone(), value.to_string());
    }
    Ok(values)
}
