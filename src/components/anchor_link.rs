use web_sys::MouseEvent;
use yew::prelude::*;

use crate::scroll::driver::{anchor_target, ScrollDriver};

#[derive(Properties, PartialEq)]
pub struct AnchorLinkProps {
    pub href: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub title: Option<AttrValue>,
    /// Fired before scrolling starts, e.g. to close the menu holding the link.
    #[prop_or_default]
    pub onnavigate: Callback<()>,
    #[prop_or_default]
    pub children: Children,
}

/// `<a>` that replaces same-document `#id` jumps with the animated scroll.
/// Links to other pages or hosts behave normally.
#[function_component(AnchorLink)]
pub fn anchor_link(props: &AnchorLinkProps) -> Html {
    let driver = use_context::<ScrollDriver>();

    let onclick = {
        let href = props.href.clone();
        let onnavigate = props.onnavigate.clone();
        Callback::from(move |e: MouseEvent| {
            // Modified clicks open tabs/windows as usual
            if e.button() != 0 || e.ctrl_key() || e.meta_key() || e.shift_key() || e.alt_key() {
                return;
            }
            let (Some(driver), Some(id)) = (driver.as_ref(), anchor_target(&href)) else {
                return;
            };
            e.prevent_default();
            onnavigate.emit(());
            driver.navigate(&id);
        })
    };

    html! {
        <a
            href={props.href.clone()}
            class={props.class.clone()}
            title={props.title.clone()}
            {onclick}
        >
            { for props.children.iter() }
        </a>
    }
}
