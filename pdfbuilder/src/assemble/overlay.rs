//! Drawing the pages of one PDF onto the pages of another.
//!
//! Each overlay page becomes a Form XObject in the base document. Base page
//! `i` draws overlay page `i % overlay_pages`, so a one-page letterhead
//! covers every page and a multi-page stamp cycles.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::pages::{materialize_inherited, page_dict_mut, page_ids};
use crate::config::OverlayPlacement;
use crate::error::{PdfBuilderError, Result};

/// XObject name prefix for the overlay form on each page.
const FORM_NAME: &str = "PbOverlay";

/// Draw `overlay` onto every page of `base`.
///
/// With [`OverlayPlacement::Background`] the overlay is drawn first and the
/// page content on top of it. With [`OverlayPlacement::Stamp`] the page
/// content is wrapped in `q ... Q` and the overlay is drawn last.
///
/// Returns the number of base pages that received the overlay.
///
/// # Errors
///
/// Fails if `overlay` has no pages or a page can't be updated.
pub fn overlay_pages(
    base: &mut Document,
    overlay: &Document,
    placement: OverlayPlacement,
) -> Result<usize> {
    let forms = import_forms(base, overlay)?;
    if forms.is_empty() {
        return Err(PdfBuilderError::merge_failed("Overlay PDF has no pages"));
    }

    materialize_inherited(base)?;
    let targets = page_ids(base);

    let save_state = base.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

    for (index, &page_id) in targets.iter().enumerate() {
        let form_id = forms[index % forms.len()];
        let name = attach_form(base, page_id, form_id)?;

        let draw = format!("q /{name} Do Q\n");
        let mut contents = content_refs(base.get_dictionary(page_id)?);
        match placement {
            OverlayPlacement::Background => {
                let draw_id = base.add_object(Stream::new(Dictionary::new(), draw.into_bytes()));
                contents.insert(0, Object::Reference(draw_id));
            }
            OverlayPlacement::Stamp => {
                let draw = format!("Q\n{draw}");
                let draw_id = base.add_object(Stream::new(Dictionary::new(), draw.into_bytes()));
                contents.insert(0, Object::Reference(save_state));
                contents.push(Object::Reference(draw_id));
            }
        }

        page_dict_mut(base, page_id)?.set("Contents", contents);
    }

    base.prune_objects();
    log::debug!(
        "overlaid {} form(s) onto {} page(s) as {placement:?}",
        forms.len(),
        targets.len()
    );

    Ok(targets.len())
}

/// Copy `overlay` into `base` and turn each of its pages into a Form
/// XObject. Returns the form ids in page order.
fn import_forms(base: &mut Document, overlay: &Document) -> Result<Vec<ObjectId>> {
    let mut stamp = overlay.clone();
    materialize_inherited(&mut stamp)?;
    stamp.renumber_objects_with(base.max_id + 1);

    let mut forms = Vec::new();
    for page_id in page_ids(&stamp) {
        let content = stamp.get_page_content(page_id)?;
        let page = stamp.get_dictionary(page_id)?;

        let bbox = page
            .get(b"MediaBox")
            .cloned()
            .unwrap_or_else(|_| Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]));
        let resources = page
            .get(b"Resources")
            .cloned()
            .unwrap_or_else(|_| Object::Dictionary(Dictionary::new()));

        let form = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => bbox,
            "Resources" => resources,
        };
        forms.push(Stream::new(form, content));
    }

    base.max_id = base.max_id.max(stamp.max_id);
    base.objects.extend(stamp.objects);

    Ok(forms
        .into_iter()
        .map(|form| base.add_object(form))
        .collect())
}

/// Register `form_id` in the page's XObject resources under a free name.
///
/// Shared resource dictionaries are copied onto the page first, so other
/// pages don't see the new entry.
fn attach_form(doc: &mut Document, page_id: ObjectId, form_id: ObjectId) -> Result<String> {
    let page = doc.get_dictionary(page_id)?;
    let mut resources = resolve_dict(doc, page.get(b"Resources").ok());
    let mut xobjects = resolve_dict(doc, resources.get(b"XObject").ok());

    let name = (0..)
        .map(|n| format!("{FORM_NAME}{n}"))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| FORM_NAME.to_string());

    xobjects.set(name.clone(), form_id);
    resources.set("XObject", xobjects);
    page_dict_mut(doc, page_id)?.set("Resources", resources);

    Ok(name)
}

fn resolve_dict(doc: &Document, object: Option<&Object>) -> Dictionary {
    match object {
        Some(Object::Dictionary(dict)) => dict.clone(),
        Some(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    }
}

fn content_refs(page: &Dictionary) -> Vec<Object> {
    match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(reference @ Object::Reference(_)) => vec![reference.clone()],
        _ => Vec::new(),
    }
}
