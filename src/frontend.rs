use gloo_console::{error, log};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use js_sys::{encode_uri_component, Array, Date, Object, Reflect};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, Document, Element, Event, EventTarget, HtmlElement, HtmlFormElement,
    HtmlInputElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::form;
use crate::scroll::{self, RevealAction, ScrollFrame, SectionGeometry};

/// Set to `Some("/api/contact")` to POST submissions to a backend. Left unset,
/// the form stays purely client-side.
const CONTACT_ENDPOINT: Option<&str> = None;
/// Set to `true` to open the visitor's mail client with the composed message.
const OPEN_MAIL_CLIENT: bool = false;

const REVEAL_THRESHOLD: f64 = 0.1;
const REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";

const MENU_TOGGLE_ID: &str = "hamburger";
const MENU_ID: &str = "navMenu";
const SHORTCUT_SECTIONS: [(&str, &str); 4] = [
    ("1", "inicio"),
    ("2", "projeto"),
    ("3", "sobre"),
    ("4", "contato"),
];

pub fn run() {
    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    wire_menu(&document);
    wire_smooth_scroll(&document);
    wire_reveal_observer(&document);
    wire_stagger_observer(&document);

    let back_to_top = create_back_to_top(&window, &document);
    wire_scroll_coordinator(&window, &document, back_to_top);

    wire_contact_form(&window, &document);
    wire_blur_validators(&document);
    wire_keyboard(&document);
    wire_analytics(&window, &document);
    wire_load(&window, &document);
}

fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    let _ = target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
    callback.forget();
}

fn for_each_element(document: &Document, selector: &str, mut visit: impl FnMut(Element)) {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return;
    };
    for index in 0..nodes.length() {
        if let Some(element) = nodes.get(index).and_then(|node| node.dyn_into::<Element>().ok())
        {
            visit(element);
        }
    }
}

fn query_html_element(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

fn scroll_into_view(target: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

// ---------------------------------------------------------------------------
// Menu toggle

fn close_menu(document: &Document) {
    for id in [MENU_TOGGLE_ID, MENU_ID] {
        if let Some(element) = document.get_element_by_id(id) {
            let _ = element.class_list().remove_1("active");
        }
    }
}

fn wire_menu(document: &Document) {
    let (Some(toggle), Some(menu)) = (
        document.get_element_by_id(MENU_TOGGLE_ID),
        document.get_element_by_id(MENU_ID),
    ) else {
        return;
    };

    let toggle_list = toggle.class_list();
    let menu_list = menu.class_list();
    listen(&toggle, "click", move |_| {
        let _ = toggle_list.toggle("active");
        let _ = menu_list.toggle("active");
    });

    // Any navigation leaves the menu closed, whatever state it was in.
    let doc = document.clone();
    for_each_element(document, ".nav-link", |link| {
        let doc = doc.clone();
        listen(&link, "click", move |_| close_menu(&doc));
    });
}

// ---------------------------------------------------------------------------
// Smooth scrolling for same-page anchors

fn wire_smooth_scroll(document: &Document) {
    let doc = document.clone();
    for_each_element(document, r#"a[href^="#"]"#, |anchor| {
        let doc = doc.clone();
        let link = anchor.clone();
        listen(&anchor, "click", move |event| {
            event.prevent_default();
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            if href == "#" {
                return;
            }
            if let Ok(Some(target)) = doc.query_selector(&href) {
                scroll_into_view(&target);
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Reveal-on-scroll observers

fn intersection_observer(
    handler: impl FnMut(Array, IntersectionObserver) + 'static,
    threshold: f64,
    root_margin: Option<&str>,
) -> Option<IntersectionObserver> {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(handler);
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .ok()?;
    callback.forget();
    Some(observer)
}

/// One-shot revealer: an element entering the viewport (risen 100px above the
/// bottom edge, 10% visible) gains `visible` and is never watched again.
fn wire_reveal_observer(document: &Document) {
    let handler = |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if scroll::one_shot_action(entry.is_intersecting()) == RevealAction::RevealAndRelease
            {
                let target = entry.target();
                let _ = target.class_list().add_1("visible");
                observer.unobserve(&target);
            }
        }
    };
    let Some(observer) =
        intersection_observer(handler, REVEAL_THRESHOLD, Some(REVEAL_ROOT_MARGIN))
    else {
        return;
    };
    for_each_element(document, ".reveal-card", |card| observer.observe(&card));
}

/// Staggered revealer: never unobserved, so re-entering the viewport re-adds
/// the class (a no-op); the delay is keyed to the entry's position in the
/// delivered batch and is not reset afterwards.
fn wire_stagger_observer(document: &Document) {
    let handler = |entries: Array, _observer: IntersectionObserver| {
        for (index, entry) in entries.iter().enumerate() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if scroll::staggered_action(entry.is_intersecting()) == RevealAction::Keep {
                continue;
            }
            if let Ok(target) = entry.target().dyn_into::<HtmlElement>() {
                let delay = format!("{}s", scroll::stagger_delay_seconds(index));
                let _ = target.style().set_property("animation-delay", &delay);
                let _ = target.class_list().add_1("visible");
            }
        }
    };
    let Some(observer) = intersection_observer(handler, REVEAL_THRESHOLD, None) else {
        return;
    };
    for_each_element(document, ".glass-card", |card| observer.observe(&card));
}

// ---------------------------------------------------------------------------
// Scroll-reactive coordinator

fn section_geometry(document: &Document) -> Vec<SectionGeometry> {
    let mut sections = Vec::new();
    for_each_element(document, "section[id]", |section| {
        let Some(id) = section.get_attribute("id") else {
            return;
        };
        if let Ok(element) = section.dyn_into::<HtmlElement>() {
            sections.push(SectionGeometry {
                id,
                top: f64::from(element.offset_top()),
            });
        }
    });
    sections
}

fn apply_scroll_frame(
    document: &Document,
    frame: &ScrollFrame,
    navbar: Option<&HtmlElement>,
    hero: Option<&HtmlElement>,
    back_to_top: Option<&HtmlElement>,
) {
    if let Some(navbar) = navbar {
        let style = navbar.style();
        let _ = style.set_property("background", frame.navbar.background());
        let _ = style.set_property("box-shadow", frame.navbar.box_shadow());
    }

    for_each_element(document, ".nav-link", |link| {
        let _ = link.class_list().remove_1("active");
        let fragment = link
            .get_attribute("href")
            .and_then(|href| href.strip_prefix('#').map(str::to_owned));
        if let (Some(fragment), Some(active)) = (fragment, frame.active_section.as_deref()) {
            if fragment == active {
                let _ = link.class_list().add_1("active");
                if let Ok(link) = link.dyn_into::<HtmlElement>() {
                    let _ = link.style().set_property("color", scroll::ACTIVE_LINK_COLOR);
                }
            }
        }
    });

    if let Some(hero) = hero {
        let position = format!("center {}px", frame.parallax_y);
        let _ = hero.style().set_property("background-position", &position);
    }

    if let Some(button) = back_to_top {
        let style = button.style();
        let (opacity, visibility) = if frame.back_to_top_visible {
            ("1", "visible")
        } else {
            ("0", "hidden")
        };
        let _ = style.set_property("opacity", opacity);
        let _ = style.set_property("visibility", visibility);
    }
}

fn wire_scroll_coordinator(window: &Window, document: &Document, back_to_top: Option<HtmlElement>) {
    let navbar = query_html_element(document, ".navbar");
    let hero = query_html_element(document, ".hero");
    let win = window.clone();
    let doc = document.clone();
    listen(window, "scroll", move |_| {
        let scroll_y = win.page_y_offset().unwrap_or(0.0);
        let frame = scroll::derive_frame(scroll_y, &section_geometry(&doc));
        apply_scroll_frame(
            &doc,
            &frame,
            navbar.as_ref(),
            hero.as_ref(),
            back_to_top.as_ref(),
        );
    });
}

// ---------------------------------------------------------------------------
// Back-to-top button

fn create_back_to_top(window: &Window, document: &Document) -> Option<HtmlElement> {
    let button: HtmlElement = document.create_element("button").ok()?.dyn_into().ok()?;
    button.set_id("backToTop");
    button.set_inner_html("↑");
    button.set_class_name("back-to-top");
    button.style().set_css_text(
        "position: fixed; bottom: 2rem; right: 2rem; width: 50px; height: 50px; \
         background: linear-gradient(135deg, #2ecc71, #3498db); color: white; border: none; \
         border-radius: 50%; cursor: pointer; opacity: 0; visibility: hidden; \
         transition: all 0.3s ease; z-index: 999; font-size: 1.5rem; display: flex; \
         align-items: center; justify-content: center; \
         box-shadow: 0 4px 12px rgba(46, 204, 113, 0.3);",
    );
    document.body()?.append_child(&button).ok()?;

    let win = window.clone();
    listen(&button, "click", move |_| {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&options);
    });

    Some(button)
}

// ---------------------------------------------------------------------------
// Contact form

#[derive(Serialize)]
struct ContactPayload {
    name: String,
    email: String,
    message: String,
    timestamp: String,
}

async fn send_contact(endpoint: &str, payload: ContactPayload) {
    let request = match Request::post(endpoint).json(&payload) {
        Ok(request) => request,
        Err(err) => {
            error!(format!("contact request build failed: {err}"));
            return;
        }
    };
    match request.send().await {
        Ok(response) if response.ok() => log!("Mensagem enviada com sucesso!"),
        Ok(response) => error!(format!("contact endpoint returned {}", response.status())),
        Err(err) => error!(format!("contact request failed: {err}")),
    }
}

fn encode(value: &str) -> String {
    encode_uri_component(value)
        .as_string()
        .unwrap_or_else(|| value.to_owned())
}

fn field_value(document: &Document, id: &str) -> Option<String> {
    let element = document.get_element_by_id(id)?;
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(|area| area.value())
}

fn wire_contact_form(window: &Window, document: &Document) {
    let Some(form_element) = document.get_element_by_id("contactForm") else {
        return;
    };
    let Ok(form_element) = form_element.dyn_into::<HtmlFormElement>() else {
        return;
    };

    // One pending revert timer at most; a fresh submission cancels the old one
    // and the feedback state keeps the idle label, so rapid resubmits cannot
    // leave the button mislabeled.
    let revert_timer: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let feedback = Rc::new(RefCell::new(form::SubmitFeedback::new()));

    let win = window.clone();
    let doc = document.clone();
    let form_handle = form_element.clone();
    listen(&form_element, "submit", move |event| {
        event.prevent_default();

        // Raw values, untrimmed: blur validation trims, submit does not.
        let name = field_value(&doc, "name").unwrap_or_default();
        let email = field_value(&doc, "email").unwrap_or_default();
        let message = field_value(&doc, "message").unwrap_or_default();

        if let Err(err) = form::validate_submission(&name, &email, &message) {
            let _ = win.alert_with_message(err.message());
            return;
        }

        let mailto = form::mailto_link(&encode(&name), &encode(&email), &encode(&message));
        if OPEN_MAIL_CLIENT {
            let _ = win.location().set_href(&mailto);
        }

        if let Some(button) = form_handle
            .query_selector(".submit-button")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        {
            let current_label = button.text_content().unwrap_or_default();
            let shown = feedback.borrow_mut().engage(&current_label);
            button.set_text_content(Some(shown));
            let _ = button
                .style()
                .set_property("background", form::SUCCESS_BACKGROUND);

            if let Some(pending) = revert_timer.borrow_mut().take() {
                pending.cancel();
            }
            let slot = revert_timer.clone();
            let feedback_slot = feedback.clone();
            let timer = Timeout::new(form::BUTTON_REVERT_MS, move || {
                if let Some(idle) = feedback_slot.borrow_mut().revert() {
                    button.set_text_content(Some(&idle));
                }
                let _ = button.style().set_property("background", "");
                slot.borrow_mut().take();
            });
            *revert_timer.borrow_mut() = Some(timer);
        }

        form_handle.reset();

        if let Some(endpoint) = CONTACT_ENDPOINT {
            let payload = ContactPayload {
                name,
                email,
                message,
                timestamp: Date::new_0().to_iso_string().into(),
            };
            spawn_local(send_contact(endpoint, payload));
        }
    });
}

fn wire_blur_validators(document: &Document) {
    if let Some(input) = document
        .get_element_by_id("name")
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
    {
        let field = input.clone();
        listen(&input, "blur", move |_| {
            let color = if form::name_needs_attention(&field.value()) {
                form::INVALID_BORDER_COLOR
            } else {
                ""
            };
            let _ = field.style().set_property("border-color", color);
        });
    }

    if let Some(input) = document
        .get_element_by_id("email")
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
    {
        let field = input.clone();
        listen(&input, "blur", move |_| {
            let color = if form::email_needs_attention(&field.value()) {
                form::INVALID_BORDER_COLOR
            } else {
                ""
            };
            let _ = field.style().set_property("border-color", color);
        });
    }
}

// ---------------------------------------------------------------------------
// Keyboard shortcuts

fn wire_keyboard(document: &Document) {
    let doc = document.clone();
    let callback = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if event.key() == "Escape" {
            close_menu(&doc);
        }

        if event.ctrl_key() || event.meta_key() {
            let key = event.key();
            let target = SHORTCUT_SECTIONS
                .iter()
                .find(|(digit, _)| *digit == key)
                .map(|(_, id)| *id);
            if let Some(id) = target {
                if let Some(section) = doc.get_element_by_id(id) {
                    scroll_into_view(&section);
                }
            }
        }
    });
    let _ =
        document.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref());
    callback.forget();
}

// ---------------------------------------------------------------------------
// Analytics

fn data_layer(window: &Window) -> Array {
    let key = JsValue::from_str("dataLayer");
    if let Ok(existing) = Reflect::get(window, &key) {
        if let Ok(array) = existing.dyn_into::<Array>() {
            return array;
        }
    }
    let array = Array::new();
    let _ = Reflect::set(window, &key, &array);
    array
}

fn push_section_view(window: &Window, section_id: &str) {
    let event = Object::new();
    let _ = Reflect::set(
        &event,
        &JsValue::from_str("event"),
        &JsValue::from_str("page_section_view"),
    );
    let _ = Reflect::set(
        &event,
        &JsValue::from_str("section_name"),
        &JsValue::from_str(section_id),
    );
    data_layer(window).push(&event);
}

/// Each section gets its own default-option observer. This "section visible"
/// signal is independent of the nav highlight's 200px look-ahead, so the two
/// can disagree on boundary frames.
fn wire_analytics(window: &Window, document: &Document) {
    let win = window.clone();
    for_each_element(document, "section[id]", move |section| {
        let Some(id) = section.get_attribute("id") else {
            return;
        };
        let win = win.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        push_section_view(&win, &id);
                    }
                }
            },
        );
        let Ok(observer) = IntersectionObserver::new(callback.as_ref().unchecked_ref()) else {
            return;
        };
        callback.forget();
        observer.observe(&section);
    });
}

// ---------------------------------------------------------------------------
// Page load

fn wire_load(window: &Window, document: &Document) {
    let doc = document.clone();
    listen(window, "load", move |_| {
        if let Some(body) = doc.body() {
            let _ = body.class_list().add_1("loaded");
        }
        log!("Projeto Vida Sem Restrição - Website Carregado");
    });
}
