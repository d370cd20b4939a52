//! Status-bar presentation: renders the styled runs as an attributed title on
//! an `NSStatusItem` and hosts the status menu.

use objc2::rc::Retained;
use objc2::runtime::{AnyObject, ProtocolObject};
use objc2::{ClassType, DefinedClass, MainThreadOnly, Message, define_class, msg_send, sel};
use objc2_app_kit::{
    NSApplication, NSBaselineOffsetAttributeName, NSColor, NSFont, NSFontAttributeName,
    NSForegroundColorAttributeName, NSMenu, NSMenuDelegate, NSMenuItem, NSStatusBar, NSStatusItem,
    NSVariableStatusItemLength,
};
use objc2_foundation::{
    MainThreadMarker, NSAttributedString, NSAttributedStringKey, NSDictionary,
    NSMutableAttributedString, NSMutableDictionary, NSNumber, NSObject, NSObjectProtocol, NSString,
};
use tracing::debug;

use crate::actor::Sender;
use crate::actor::indicator::Event;
use crate::model::label::{Label, RunStyle};

const PLAIN_FONT_SIZE: f64 = 12.0;
const CURRENT_FONT_SIZE: f64 = 16.0;
const PLAIN_BASELINE_OFFSET: f64 = 1.0;

pub struct StatusIcon {
    status_item: Retained<NSStatusItem>,
    _menu: Retained<NSMenu>,
    _handler: Retained<MenuActionHandler>,
    mtm: MainThreadMarker,
}

impl StatusIcon {
    pub fn new(mtm: MainThreadMarker, events_tx: Sender<Event>) -> Self {
        let status_bar = NSStatusBar::systemStatusBar();
        let status_item = status_bar.statusItemWithLength(NSVariableStatusItemLength);
        let handler = MenuActionHandler::new(mtm, events_tx);
        let menu = build_status_menu(mtm, &handler);
        unsafe { menu.setDelegate(Some(ProtocolObject::from_ref(&*handler))) };
        status_item.setMenu(Some(&menu));
        status_item.setVisible(true);

        Self {
            status_item,
            _menu: menu,
            _handler: handler,
            mtm,
        }
    }

    /// Presentation sink entry point; must run on the main thread.
    pub fn apply(&mut self, label: &Label, menu_open: bool) {
        let title = build_attributed_title(label, menu_open);
        if let Some(button) = self.status_item.button(self.mtm) {
            unsafe { button.setAttributedTitle(&title) };
        }
    }
}

impl Drop for StatusIcon {
    fn drop(&mut self) {
        debug!("removing status item");

        let status_bar = NSStatusBar::systemStatusBar();
        status_bar.removeStatusItem(&self.status_item);
    }
}

fn neutral_color(label: &Label, menu_open: bool) -> Retained<NSColor> {
    // The open menu highlights the item on a dark background in either theme.
    if label.dark_mode || menu_open {
        NSColor::whiteColor()
    } else {
        NSColor::blackColor()
    }
}

fn build_attributed_title(label: &Label, menu_open: bool) -> Retained<NSAttributedString> {
    let neutral = neutral_color(label, menu_open);
    let plain_font = NSFont::systemFontOfSize(PLAIN_FONT_SIZE);
    let bold_font = NSFont::boldSystemFontOfSize(CURRENT_FONT_SIZE);

    let empty = NSString::from_str("");
    let result: Retained<NSMutableAttributedString> =
        unsafe { msg_send![NSMutableAttributedString::alloc(), initWithString: &*empty] };
    for run in &label.runs {
        let attrs = match run.style {
            RunStyle::Plain => {
                build_text_attrs(&plain_font, &neutral, Some(PLAIN_BASELINE_OFFSET))
            }
            RunStyle::Current { active } => {
                let color = if active {
                    NSColor::redColor()
                } else {
                    NSColor::greenColor()
                };
                build_text_attrs(&bold_font, &color, None)
            }
            RunStyle::Separator => build_text_attrs(&bold_font, &neutral, None),
        };
        let text = NSString::from_str(&run.text);
        let piece: Retained<NSAttributedString> = unsafe {
            msg_send![NSAttributedString::alloc(), initWithString: &*text, attributes: &*attrs]
        };
        unsafe { result.appendAttributedString(&piece) };
    }
    unsafe { Retained::cast_unchecked(result) }
}

fn as_any_object<T: Message>(obj: &T) -> &AnyObject {
    unsafe { &*(obj as *const T as *const AnyObject) }
}

fn build_text_attrs(
    font: &NSFont,
    color: &NSColor,
    baseline_offset: Option<f64>,
) -> Retained<NSDictionary<NSAttributedStringKey, AnyObject>> {
    let dict = NSMutableDictionary::<NSAttributedStringKey, AnyObject>::new();
    unsafe {
        dict.setObject_forKeyedSubscript(
            Some(as_any_object(font)),
            ProtocolObject::from_ref(NSFontAttributeName),
        );
        dict.setObject_forKeyedSubscript(
            Some(as_any_object(color)),
            ProtocolObject::from_ref(NSForegroundColorAttributeName),
        );
        if let Some(offset) = baseline_offset {
            let offset = NSNumber::new_f64(offset);
            dict.setObject_forKeyedSubscript(
                Some(as_any_object(&*offset)),
                ProtocolObject::from_ref(NSBaselineOffsetAttributeName),
            );
        }
    }
    unsafe { Retained::cast_unchecked(dict) }
}

fn make_menu_item(
    mtm: MainThreadMarker,
    title: &str,
    action: Option<objc2::runtime::Sel>,
    target: Option<&MenuActionHandler>,
) -> Retained<NSMenuItem> {
    let ns_title = NSString::from_str(title);
    let key_equivalent = NSString::from_str("");
    let item: Retained<NSMenuItem> = unsafe {
        msg_send![NSMenuItem::alloc(mtm), initWithTitle: &*ns_title, action: action, keyEquivalent: &*key_equivalent]
    };
    if let Some(target) = target {
        unsafe {
            item.setTarget(Some(as_any_object(target)));
        }
    }
    item
}

fn add_separator(menu: &NSMenu) {
    let separator: Retained<NSMenuItem> = unsafe { msg_send![NSMenuItem::class(), separatorItem] };
    menu.addItem(&separator);
}

fn build_status_menu(mtm: MainThreadMarker, handler: &MenuActionHandler) -> Retained<NSMenu> {
    let title = NSString::from_str("SpaceMark");
    let menu: Retained<NSMenu> = unsafe { msg_send![NSMenu::alloc(mtm), initWithTitle: &*title] };

    menu.addItem(&make_menu_item(
        mtm,
        "Refresh Now",
        Some(sel!(onRefreshNow:)),
        Some(handler),
    ));
    add_separator(&menu);
    menu.addItem(&make_menu_item(
        mtm,
        "Quit SpaceMark",
        Some(sel!(onQuit:)),
        Some(handler),
    ));

    menu
}

struct MenuHandlerIvars {
    events_tx: Sender<Event>,
}

impl MenuActionHandler {
    fn new(mtm: MainThreadMarker, events_tx: Sender<Event>) -> Retained<Self> {
        let this = mtm.alloc().set_ivars(MenuHandlerIvars { events_tx });
        unsafe { msg_send![super(this), init] }
    }
}

define_class!(
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "SpacemarkMenuHandler"]
    #[ivars = MenuHandlerIvars]
    struct MenuActionHandler;

    unsafe impl NSObjectProtocol for MenuActionHandler {}

    unsafe impl NSMenuDelegate for MenuActionHandler {
        #[unsafe(method(menuWillOpen:))]
        fn menu_will_open(&self, _menu: &NSMenu) {
            self.ivars().events_tx.send(Event::MenuOpened(true));
        }

        #[unsafe(method(menuDidClose:))]
        fn menu_did_close(&self, _menu: &NSMenu) {
            self.ivars().events_tx.send(Event::MenuOpened(false));
        }
    }

    impl MenuActionHandler {
        #[unsafe(method(onRefreshNow:))]
        fn on_refresh_now(&self, _sender: Option<&AnyObject>) {
            self.ivars().events_tx.send(Event::Refresh);
        }

        #[unsafe(method(onQuit:))]
        fn on_quit(&self, _sender: Option<&AnyObject>) {
            let app = NSApplication::sharedApplication(self.mtm());
            unsafe { app.terminate(None) };
        }
    }
);
