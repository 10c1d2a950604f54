use crate::api::config_from_js;
use crate::error::to_js_error;
use floorplan::{FloorId, Registry, Size};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, HtmlInputElement,
    KeyboardEvent, MouseEvent, Window,
};

type Shared<T> = Rc<RefCell<T>>;

fn by_id<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected element type")))
}

fn listen<E: JsCast + 'static>(
    target: &EventTarget,
    event: &str,
    mut f: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        if let Ok(e) = e.dyn_into::<E>() {
            f(e);
        }
    }));
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn closest(e: &Event, selector: &str) -> Option<Element> {
    let target = e.target()?.dyn_into::<Element>().ok()?;
    target.closest(selector).ok()?
}

/// Element under an event that carries `attr`, searching up from the target.
fn closest_attr(e: &Event, attr: &str) -> Option<(Element, String)> {
    let el = closest(e, &format!("[{attr}]"))?;
    let value = el.get_attribute(attr)?;
    Some((el, value))
}

/// Display position of a mouse event relative to `el`.
fn local_point(el: &Element, e: &MouseEvent) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    (e.client_x() as f64 - rect.left(), e.client_y() as f64 - rect.top())
}

/// Native and laid-out size of a loaded image; `None` until it has loaded.
fn image_sizes(img: &HtmlImageElement) -> Option<(Size, Size)> {
    let natural = Size::new(img.natural_width() as f64, img.natural_height() as f64);
    let displayed = Size::new(img.offset_width() as f64, img.offset_height() as f64);
    if natural.width <= 0.0 || displayed.width <= 0.0 {
        return None;
    }
    Some((natural, displayed))
}

fn write_clipboard(window: &Window, text: String) {
    let promise = window.navigator().clipboard().write_text(&text);
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::warn!("clipboard write failed: {:?}", e);
        }
    });
}

fn floor_buttons(doc: &Document) -> Result<Vec<Element>, JsValue> {
    let nodes = doc.query_selector_all(".floor-btn[data-floor]")?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i)?.dyn_into::<Element>().ok())
        .collect())
}

fn image_src(registry: &Registry, floor: &FloorId) -> Option<String> {
    registry.floor(floor).map(|f| f.image.clone())
}

/// Debounced callback: every `schedule` restarts the wait.
struct Debounce {
    window: Window,
    delay_ms: i32,
    handle: Option<i32>,
    callback: Closure<dyn FnMut()>,
}

impl Debounce {
    fn schedule(&mut self) {
        if let Some(h) = self.handle.take() {
            self.window.clear_timeout_with_handle(h);
        }
        self.handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                self.delay_ms,
            )
            .ok();
    }
}

struct ViewerPage {
    window: Window,
    viewer: floorplan::Viewer,
    image: HtmlImageElement,
    overlay: HtmlElement,
    list: Element,
    details: Element,
    instructions: Element,
    scroller: Option<Element>,
    zoom_label: Option<Element>,
    floor_buttons: Vec<Element>,
}

impl ViewerPage {
    fn measure(&mut self) {
        let Some((natural, displayed)) = image_sizes(&self.image) else {
            return;
        };
        if let Err(e) = self.viewer.set_image_size(natural, displayed) {
            log::warn!("ignoring image size: {}", e);
        }
    }

    fn render(&self) {
        self.overlay.set_inner_html(&self.viewer.overlay_html());
        self.list.set_inner_html(&self.viewer.list_html());
        self.details.set_inner_html(&self.viewer.details_html());
        self.instructions.set_text_content(Some(self.viewer.instructions()));
        let zoom = self.viewer.zoom();
        let style = self.image.style();
        let _ = style.set_property("transform", &format!("scale({zoom})"));
        let _ = style.set_property("transform-origin", "top left");
        if let Some(label) = &self.zoom_label {
            label.set_text_content(Some(&format!("{}%", self.viewer.zoom_percent())));
        }
        let floor = self.viewer.floor().as_str();
        for b in &self.floor_buttons {
            let active = b.get_attribute("data-floor").as_deref() == Some(floor);
            let _ = b.class_list().toggle_with_force("active", active);
        }
    }

    fn viewport(&self) -> Size {
        match &self.scroller {
            Some(s) => Size::new(s.client_width() as f64, s.client_height() as f64),
            None => Size::new(
                self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
                self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
            ),
        }
    }

    fn center_on(&mut self, name: &str) {
        let viewport = self.viewport();
        match self.viewer.center_on(name, viewport) {
            Ok(offset) => {
                if let Some(s) = &self.scroller {
                    s.set_scroll_top(offset.round() as i32);
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    fn switch_floor(&mut self, id: &str) {
        let id = FloorId::new(id);
        if let Err(e) = self.viewer.switch_floor(&id) {
            log::warn!("{}", e);
            return;
        }
        if let Some(src) = image_src(self.viewer.registry(), &id) {
            self.image.set_src(&src);
        }
    }
}

/// Wires the room-location page: floor image `#floor-plan`, marker overlay
/// `#room-markers`, room list `#rooms-container`, details `#room-details`,
/// `#instruction-text`, search box `#room-search` and the optional
/// `#show-all-btn`, `#hide-all-btn`, `#clear-selection-btn`, `#zoom-in-btn`,
/// `#zoom-out-btn`, `#zoom-level`, `#map-wrapper` and `.floor-btn[data-floor]`.
#[wasm_bindgen]
pub fn mount_viewer(config: JsValue) -> Result<(), JsValue> {
    let config = config_from_js(config)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let debounce_ms = config.resize_debounce_ms as i32;
    let viewer = floorplan::Viewer::new(Registry::builtin().map_err(to_js_error)?, config)
        .map_err(to_js_error)?;

    let floor_buttons = floor_buttons(&document)?;
    let page: Shared<ViewerPage> = Rc::new(RefCell::new(ViewerPage {
        window: window.clone(),
        viewer,
        image: by_id(&document, "floor-plan")?,
        overlay: by_id(&document, "room-markers")?,
        list: by_id(&document, "rooms-container")?,
        details: by_id(&document, "room-details")?,
        instructions: by_id(&document, "instruction-text")?,
        scroller: document.get_element_by_id("map-wrapper"),
        zoom_label: document.get_element_by_id("zoom-level"),
        floor_buttons: floor_buttons.clone(),
    }));

    {
        let p = page.borrow();
        listen::<Event>(&p.image, "load", {
            let page = page.clone();
            move |_| {
                let mut p = page.borrow_mut();
                p.measure();
                p.render();
            }
        })?;

        listen::<Event>(&p.list, "click", {
            let page = page.clone();
            move |e| {
                if let Some((_, name)) = closest_attr(&e, "data-room") {
                    let mut p = page.borrow_mut();
                    if let Err(err) = p.viewer.select(&name) {
                        log::warn!("{}", err);
                    }
                    p.render();
                }
            }
        })?;

        listen::<Event>(&p.details, "click", {
            let page = page.clone();
            move |e| {
                let Some((el, action)) = closest_attr(&e, "data-action") else {
                    if let Some((btn, _)) = closest_attr(&e, "aria-controls") {
                        toggle_biography(&btn);
                    }
                    return;
                };
                let Some(name) = el.get_attribute("data-room") else { return };
                let mut p = page.borrow_mut();
                match action.as_str() {
                    "center" => {
                        p.center_on(&name);
                        p.render();
                    }
                    "copy" => match p.viewer.copy_text(&name) {
                        Ok(text) => {
                            write_clipboard(&p.window, text);
                            p.instructions.set_text_content(Some(
                                "Informações da sala copiadas para a área de transferência!",
                            ));
                        }
                        Err(err) => log::warn!("{}", err),
                    },
                    _ => {}
                }
            }
        })?;

        listen::<MouseEvent>(&p.overlay, "click", {
            let page = page.clone();
            move |e| {
                let mut p = page.borrow_mut();
                let (x, y) = local_point(&p.overlay, &e);
                if p.viewer.click(x, y).is_some() {
                    p.render();
                }
            }
        })?;

        for b in &floor_buttons {
            let Some(id) = b.get_attribute("data-floor") else { continue };
            listen::<Event>(b, "click", {
                let page = page.clone();
                move |_| {
                    let mut p = page.borrow_mut();
                    p.switch_floor(&id);
                    p.render();
                }
            })?;
        }
    }

    if let Ok(search) = by_id::<HtmlInputElement>(&document, "room-search") {
        let input = search.clone();
        listen::<Event>(&search, "input", {
            let page = page.clone();
            move |_| {
                let mut p = page.borrow_mut();
                p.viewer.filter(&input.value());
                p.render();
            }
        })?;
    }

    let buttons: [(&str, fn(&mut floorplan::Viewer)); 5] = [
        ("show-all-btn", |v| v.show_all()),
        ("hide-all-btn", |v| v.hide_all()),
        ("clear-selection-btn", |v| v.clear_selection()),
        ("zoom-in-btn", |v| {
            v.zoom_in();
        }),
        ("zoom-out-btn", |v| {
            v.zoom_out();
        }),
    ];
    for (id, action) in buttons {
        let Some(btn) = document.get_element_by_id(id) else { continue };
        listen::<Event>(&btn, "click", {
            let page = page.clone();
            move |_| {
                let mut p = page.borrow_mut();
                action(&mut p.viewer);
                p.render();
            }
        })?;
    }

    listen::<KeyboardEvent>(&document, "keydown", {
        let page = page.clone();
        move |e| {
            let direction = match e.key().as_str() {
                "ArrowDown" => 1,
                "ArrowUp" => -1,
                "Escape" => {
                    let mut p = page.borrow_mut();
                    p.viewer.clear_selection();
                    p.render();
                    return;
                }
                _ => return,
            };
            e.prevent_default();
            let mut p = page.borrow_mut();
            p.viewer.navigate(direction);
            p.render();
        }
    })?;

    let resize = Rc::new(RefCell::new(Debounce {
        window: window.clone(),
        delay_ms: debounce_ms,
        handle: None,
        callback: Closure::<dyn FnMut()>::wrap(Box::new({
            let page = page.clone();
            move || {
                let mut p = page.borrow_mut();
                p.measure();
                p.render();
            }
        })),
    }));
    listen::<Event>(&window, "resize", move |_| resize.borrow_mut().schedule())?;

    {
        let mut p = page.borrow_mut();
        if p.image.complete() {
            p.measure();
        }
        p.render();
    }
    log::info!("floor plan viewer mounted");
    Ok(())
}

fn toggle_biography(button: &Element) {
    let Some(target) = button.get_attribute("aria-controls") else { return };
    let Some(panel) = button.owner_document().and_then(|d| d.get_element_by_id(&target)) else {
        return;
    };
    let expanded = panel.class_list().toggle("expanded").unwrap_or(false);
    let _ = button.set_attribute("aria-expanded", if expanded { "true" } else { "false" });
    button.set_text_content(Some(floorplan::html::expand_label(expanded)));
}

struct CapturePage {
    window: Window,
    document: Document,
    tool: floorplan::CaptureTool,
    registry: Registry,
    image: HtmlImageElement,
    overlay: HtmlElement,
    list: Element,
    instructions: Element,
    add_button: Option<Element>,
    floor_buttons: Vec<Element>,
}

impl CapturePage {
    fn scale(&self) -> Option<floorplan::Scale> {
        let (natural, displayed) = image_sizes(&self.image)?;
        floorplan::Scale::new(natural, displayed).ok()
    }

    fn render(&self) {
        let markers = self.scale().map(|s| self.tool.overlay_html(&s)).unwrap_or_default();
        self.overlay.set_inner_html(&markers);
        self.list.set_inner_html(&self.tool.list_html(&self.registry));
        self.instructions.set_text_content(Some(self.tool.instructions()));
        let selecting = self.tool.is_selecting();
        if let Some(b) = &self.add_button {
            let _ = b.class_list().toggle_with_force("active", selecting);
        }
        let _ = self.overlay.class_list().toggle_with_force("selection-mode", selecting);
        let floor = self.tool.floor().as_str();
        for b in &self.floor_buttons {
            let active = b.get_attribute("data-floor").as_deref() == Some(floor);
            let _ = b.class_list().toggle_with_force("active", active);
        }
    }

    /// Asks for a name; an empty or cancelled prompt records nothing.
    fn capture(&mut self, at: Option<(f64, f64)>) {
        let Some(scale) = self.scale() else { return };
        let name = self
            .window
            .prompt_with_message("Digite o nome da sala/localização:")
            .ok()
            .flatten()
            .unwrap_or_default();
        if name.trim().is_empty() {
            return;
        }
        let r = match at {
            Some((x, y)) => self.tool.capture(floorplan::Point::new(x, y), &scale, &name).map(|_| ()),
            None => self.tool.capture_center(&scale, &name).map(|_| ()),
        };
        if let Err(e) = r {
            log::warn!("capture failed: {}", e);
        }
    }

    fn save(&self) {
        let json = match self.tool.export_json() {
            Ok(j) => j,
            Err(e) => {
                let _ = self.window.alert_with_message(&format!("{e}"));
                return;
            }
        };
        let copy = self
            .window
            .confirm_with_message(
                "Coordenadas prontas para salvar!\n\nOK = Copiar para área de transferência\nCancelar = Baixar como arquivo",
            )
            .unwrap_or(false);
        if copy {
            write_clipboard(&self.window, json);
        } else if let Err(e) = self.download(&json) {
            log::error!("download failed: {:?}", e);
        }
    }

    fn download(&self, json: &str) -> Result<(), JsValue> {
        let date = String::from(js_sys::Date::new_0().to_iso_string());
        let filename = floorplan::CaptureTool::export_filename(date.get(..10).unwrap_or(""));
        let parts = js_sys::Array::of1(&JsValue::from_str(json));
        let blob = web_sys::Blob::new_with_str_sequence(&parts)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;
        let a = self.document.create_element("a")?.dyn_into::<HtmlElement>()?;
        a.set_attribute("href", &url)?;
        a.set_attribute("download", &filename)?;
        a.click();
        web_sys::Url::revoke_object_url(&url)?;
        Ok(())
    }
}

/// Wires the coordinate-capture page: `#floor-plan`, `#coordinates-overlay`,
/// `#coordinates-container`, `#instruction-text`, `#add-coordinate-btn`,
/// `#save-coordinates-btn` and `.floor-btn[data-floor]`.
#[wasm_bindgen]
pub fn mount_capture() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let floor_buttons = floor_buttons(&document)?;
    let page: Shared<CapturePage> = Rc::new(RefCell::new(CapturePage {
        window: window.clone(),
        document: document.clone(),
        tool: floorplan::CaptureTool::default(),
        registry: Registry::builtin().map_err(to_js_error)?,
        image: by_id(&document, "floor-plan")?,
        overlay: by_id(&document, "coordinates-overlay")?,
        list: by_id(&document, "coordinates-container")?,
        instructions: by_id(&document, "instruction-text")?,
        add_button: document.get_element_by_id("add-coordinate-btn"),
        floor_buttons: floor_buttons.clone(),
    }));

    {
        let p = page.borrow();
        let _ = p.overlay.set_attribute("role", "application");
        let _ = p.overlay.set_attribute("tabindex", "0");
        let _ = p.overlay.set_attribute(
            "aria-label",
            "Área de coordenadas - clique para adicionar coordenadas",
        );

        listen::<Event>(&p.image, "load", {
            let page = page.clone();
            move |_| page.borrow().render()
        })?;

        listen::<MouseEvent>(&p.overlay, "click", {
            let page = page.clone();
            move |e| {
                let mut p = page.borrow_mut();
                if !p.tool.is_selecting() {
                    return;
                }
                let at = local_point(&p.overlay, &e);
                p.capture(Some(at));
                p.render();
            }
        })?;

        listen::<KeyboardEvent>(&p.overlay, "keydown", {
            let page = page.clone();
            move |e| {
                if e.key() != "Enter" && e.key() != " " {
                    return;
                }
                e.prevent_default();
                let mut p = page.borrow_mut();
                if p.tool.is_selecting() {
                    p.capture(None);
                    p.render();
                }
            }
        })?;

        listen::<Event>(&p.list, "click", {
            let page = page.clone();
            move |e| {
                let Some(btn) = closest(&e, ".remove-btn") else { return };
                let Some(Ok(id)) = btn.get_attribute("data-id").map(|v| v.parse::<u32>()) else {
                    return;
                };
                let mut p = page.borrow_mut();
                if let Err(err) = p.tool.remove(id) {
                    log::warn!("{}", err);
                }
                p.render();
            }
        })?;

        for b in &floor_buttons {
            let Some(id) = b.get_attribute("data-floor") else { continue };
            listen::<Event>(b, "click", {
                let page = page.clone();
                move |_| {
                    let mut p = page.borrow_mut();
                    let floor = FloorId::new(id.as_str());
                    if let Some(src) = image_src(&p.registry, &floor) {
                        p.image.set_src(&src);
                    }
                    p.tool.switch_floor(floor);
                    p.render();
                }
            })?;
        }
    }

    if let Some(btn) = document.get_element_by_id("add-coordinate-btn") {
        listen::<Event>(&btn, "click", {
            let page = page.clone();
            move |_| {
                let mut p = page.borrow_mut();
                p.tool.toggle_selection();
                p.render();
            }
        })?;
    }
    if let Some(btn) = document.get_element_by_id("save-coordinates-btn") {
        listen::<Event>(&btn, "click", {
            let page = page.clone();
            move |_| page.borrow().save()
        })?;
    }

    listen::<KeyboardEvent>(&document, "keydown", {
        let page = page.clone();
        move |e| {
            if e.key() == "Escape" {
                let mut p = page.borrow_mut();
                if p.tool.cancel_selection() {
                    p.render();
                }
            } else if e.ctrl_key() && e.key() == "s" {
                e.prevent_default();
                page.borrow().save();
            }
        }
    })?;

    let resize = Rc::new(RefCell::new(Debounce {
        window: window.clone(),
        delay_ms: floorplan::ViewerConfig::default().resize_debounce_ms as i32,
        handle: None,
        callback: Closure::<dyn FnMut()>::wrap(Box::new({
            let page = page.clone();
            move || page.borrow().render()
        })),
    }));
    listen::<Event>(&window, "resize", move |_| resize.borrow_mut().schedule())?;

    page.borrow().render();
    log::info!("coordinate capture mounted");
    Ok(())
}
