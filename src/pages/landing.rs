use yew::prelude::*;

use crate::components::anchor_link::AnchorLink;
use crate::hooks::{use_preference, use_preferences};
use crate::i18n::{Nav, Translations};

/// In-page destinations, in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Home,
    Products,
    Services,
    Portfolio,
    Team,
    Careers,
    Blog,
    Faq,
    Contact,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Home,
        Section::Products,
        Section::Services,
        Section::Portfolio,
        Section::Team,
        Section::Careers,
        Section::Blog,
        Section::Faq,
        Section::Contact,
    ];

    /// Shown directly on the dock; the rest live in its menu.
    pub const DOCK: [Section; 5] = [
        Section::Home,
        Section::Products,
        Section::Services,
        Section::Portfolio,
        Section::Contact,
    ];

    pub const DOCK_MENU: [Section; 4] = [
        Section::Team,
        Section::Careers,
        Section::Blog,
        Section::Faq,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Products => "products",
            Section::Services => "services",
            Section::Portfolio => "portfolio",
            Section::Team => "team",
            Section::Careers => "careers",
            Section::Blog => "blog",
            Section::Faq => "faq",
            Section::Contact => "contact",
        }
    }

    pub fn href(self) -> String {
        format!("#{}", self.id())
    }

    pub fn label(self, nav: &Nav) -> &str {
        match self {
            Section::Home => &nav.home,
            Section::Products => &nav.products,
            Section::Services => &nav.services,
            Section::Portfolio => &nav.portfolio,
            Section::Team => &nav.team,
            Section::Careers => &nav.careers,
            Section::Blog => &nav.blog,
            Section::Faq => &nav.faq,
            Section::Contact => &nav.contact,
        }
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let preferences = use_preferences();
    let locale = use_preference(preferences.locale());
    let text = Translations::for_locale(locale);

    html! {
        <main class="landing-page">
            <section id={Section::Home.id()} class="hero">
                <div class="container">
                    <h1>
                        <span class="hero-title1">{&text.hero.title1}</span>
                        <span class="hero-title2">{&text.hero.title2}</span>
                    </h1>
                    <AnchorLink href={Section::Contact.href()} class="btn">
                        {&text.hero.cta}
                    </AnchorLink>
                </div>
            </section>
            {
                for Section::ALL.iter().skip(1).map(|section| html! {
                    <section id={section.id()} class="section" key={section.id()}>
                        <div class="container">
                            <h2>{section.label(&text.nav)}</h2>
                        </div>
                    </section>
                })
            }
        </main>
    }
}
