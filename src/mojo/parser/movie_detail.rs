use anyhow::Context;
use log::{debug, warn};
use scraper::{ElementRef, Html};
use strum::Display;
use thiserror::Error;

use crate::mojo::{
    normalize,
    schema::{GenreList, MovieRecord, MovieTitle, RawMoney},
};

const MARKER_MPAA: &str = "MPAA";
const MARKER_BUDGET: &str = "Budget";
const MARKER_OPENING: &str = "Opening";
const MARKER_GENRES: &str = "Genres";

/// Known shapes of the summary block. Which fields a page carries, and at
/// which positions, depends on its release type.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum LayoutVariant {
    StandardDomestic,
    InternationalWithBudget,
    BudgetNoMpaa,
    ForeignRerelease,
    DocumentarySpecial,
    Fallback,
}

/// One label/value row of the summary block.
#[derive(Debug)]
pub struct SummarySlot {
    label: String,
    value: Option<String>,
    money: Option<String>,
    anchor: Option<String>,
}

impl SummarySlot {
    fn from_element(section: ElementRef) -> Option<Self> {
        let mut spans = section
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "span");
        let label = spans.next()?.text().collect::<String>().trim().to_owned();
        // The value is the second span's first non-blank text node, so that
        // trailing markup (company links, theater counts) does not leak in.
        let value = spans.next().and_then(|span| {
            span.text()
                .find(|text| !text.trim().is_empty())
                .map(|text| text.trim().to_owned())
        });
        let money = section
            .select(selector!("span.money"))
            .next()
            .map(|span| span.text().collect::<String>().trim().to_owned());
        let anchor = section
            .select(selector!("span a"))
            .next()
            .map(|a| a.text().collect::<String>().trim().to_owned());
        Some(SummarySlot {
            label,
            value,
            money,
            anchor,
        })
    }
}

/// Which part of a slot a field is read from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SlotPart {
    Value,
    Money,
    Anchor,
}

/// Source of one semantic field: a 1-based slot index and the part to read.
#[derive(Clone, Copy, Debug)]
pub struct SlotRef {
    pub slot: usize,
    pub part: SlotPart,
}

/// Slot sources for every variant-dependent field. `None` means the
/// variant's pages do not carry that field.
#[derive(Clone, Copy, Debug)]
pub struct FieldMap {
    pub distributor: Option<SlotRef>,
    pub opening_amount: Option<SlotRef>,
    pub budget: Option<SlotRef>,
    pub release_date: Option<SlotRef>,
    pub mpaa_rating: Option<SlotRef>,
    pub running_time: Option<SlotRef>,
    pub genres: Option<SlotRef>,
    pub in_release: Option<SlotRef>,
    pub widest_release: Option<SlotRef>,
}

const fn value(slot: usize) -> Option<SlotRef> {
    Some(SlotRef {
        slot,
        part: SlotPart::Value,
    })
}

const fn money(slot: usize) -> Option<SlotRef> {
    Some(SlotRef {
        slot,
        part: SlotPart::Money,
    })
}

const fn anchor(slot: usize) -> Option<SlotRef> {
    Some(SlotRef {
        slot,
        part: SlotPart::Anchor,
    })
}

static STANDARD_DOMESTIC: FieldMap = FieldMap {
    distributor: value(1),
    opening_amount: money(2),
    budget: None,
    release_date: anchor(3),
    mpaa_rating: value(4),
    running_time: value(5),
    genres: value(6),
    in_release: value(7),
    widest_release: value(8),
};

static INTERNATIONAL_WITH_BUDGET: FieldMap = FieldMap {
    distributor: value(1),
    opening_amount: money(2),
    budget: money(3),
    release_date: anchor(4),
    mpaa_rating: value(5),
    running_time: value(6),
    genres: value(7),
    in_release: value(8),
    widest_release: value(9),
};

static BUDGET_NO_MPAA: FieldMap = FieldMap {
    distributor: value(1),
    opening_amount: money(2),
    budget: money(3),
    release_date: anchor(4),
    mpaa_rating: None,
    running_time: value(5),
    genres: value(6),
    in_release: value(7),
    widest_release: value(8),
};

// The remaining three tables assume pages that dropped the opening or MPAA
// rows, shifting everything after them up. On any other page shape they pick
// up neighboring rows instead; that mis-assignment is accepted best-effort
// output (see DESIGN.md) and must not be "corrected" here.
static FOREIGN_RERELEASE: FieldMap = FieldMap {
    distributor: value(1),
    opening_amount: None,
    budget: None,
    release_date: anchor(2),
    mpaa_rating: None,
    running_time: value(3),
    genres: value(4),
    in_release: value(5),
    widest_release: value(6),
};

static DOCUMENTARY_SPECIAL: FieldMap = FieldMap {
    distributor: value(1),
    opening_amount: money(2),
    budget: None,
    release_date: anchor(3),
    mpaa_rating: None,
    running_time: None,
    genres: value(4),
    in_release: value(5),
    widest_release: value(6),
};

static FALLBACK: FieldMap = FieldMap {
    distributor: value(1),
    opening_amount: money(2),
    budget: None,
    release_date: anchor(3),
    mpaa_rating: None,
    running_time: value(4),
    genres: value(5),
    in_release: value(6),
    widest_release: value(7),
};

impl LayoutVariant {
    pub fn field_map(self) -> &'static FieldMap {
        match self {
            LayoutVariant::StandardDomestic => &STANDARD_DOMESTIC,
            LayoutVariant::InternationalWithBudget => &INTERNATIONAL_WITH_BUDGET,
            LayoutVariant::BudgetNoMpaa => &BUDGET_NO_MPAA,
            LayoutVariant::ForeignRerelease => &FOREIGN_RERELEASE,
            LayoutVariant::DocumentarySpecial => &DOCUMENTARY_SPECIAL,
            LayoutVariant::Fallback => &FALLBACK,
        }
    }
}

/// Decides the layout by inspecting marker labels at fixed slot positions.
/// The checks run in a fixed order and the first match wins; a page matching
/// none of the markers is Fallback, never an error.
pub fn classify(slots: &[SummarySlot]) -> LayoutVariant {
    let label = |index: usize| slots.get(index - 1).map(|slot| slot.label.as_str());
    if label(4) == Some(MARKER_MPAA) {
        LayoutVariant::StandardDomestic
    } else if label(3) == Some(MARKER_BUDGET) {
        if label(5) == Some(MARKER_MPAA) {
            LayoutVariant::InternationalWithBudget
        } else {
            LayoutVariant::BudgetNoMpaa
        }
    } else if label(2) != Some(MARKER_OPENING) {
        LayoutVariant::ForeignRerelease
    } else if label(4) == Some(MARKER_GENRES) {
        LayoutVariant::DocumentarySpecial
    } else {
        LayoutVariant::Fallback
    }
}

/// A mapped slot was not present on the page. The field is recorded as
/// absent and extraction keeps going.
#[derive(Debug, Error)]
#[error("{field} not found: slot {slot} is absent or empty")]
pub struct MissingFieldError {
    field: &'static str,
    slot: usize,
}

fn read_slot(slots: &[SummarySlot], source: SlotRef) -> Option<String> {
    let slot = slots.get(source.slot - 1)?;
    let text = match source.part {
        SlotPart::Value => slot.value.as_deref(),
        SlotPart::Money => slot.money.as_deref(),
        SlotPart::Anchor => slot.anchor.as_deref(),
    }?;
    Some(text.to_owned())
}

pub fn parse(html: &Html) -> anyhow::Result<MovieRecord> {
    let title = MovieTitle::from(
        html.select(selector!("h1.a-size-extra-large"))
            .next()
            .context("title heading not found in detail page")?
            .text()
            .collect::<String>()
            .trim()
            .to_owned(),
    );
    let description = html
        .select(selector!("p.a-size-medium"))
        .next()
        .and_then(|p| p.text().find(|text| !text.trim().is_empty()))
        .map(|text| text.trim().to_owned());
    let [domestic, international, worldwide] = money_summary(html)?;
    let slots = summary_slots(html);
    let variant = classify(&slots);
    debug!("{title}: {} summary slots, layout {variant}", slots.len());

    let field = |name: &'static str, source: Option<SlotRef>| -> Option<String> {
        let source = source?;
        match read_slot(&slots, source) {
            Some(text) => Some(text),
            None => {
                warn!(
                    "{title}: {}",
                    MissingFieldError {
                        field: name,
                        slot: source.slot,
                    }
                );
                None
            }
        }
    };

    let map = variant.field_map();
    let distributor = field("distributor", map.distributor);
    let opening_amount = field("opening amount", map.opening_amount).map(RawMoney::from);
    let budget = field("budget", map.budget).map(RawMoney::from);
    let release_date = field("release date", map.release_date);
    let mpaa_rating = field("MPAA rating", map.mpaa_rating);
    let running_time = field("running time", map.running_time);
    let genres: GenreList = field("genres", map.genres)
        .map(|blob| normalize::split_list(&blob))
        .unwrap_or_default()
        .into();
    let in_release = field("in-release", map.in_release);
    let widest_release = field("widest release", map.widest_release);

    Ok(MovieRecord::builder()
        .title(title)
        .description(description)
        .domestic_bo(domestic)
        .international_bo(international)
        .worldwide_bo(worldwide)
        .distributor(distributor)
        .opening_amount(opening_amount)
        .budget(budget)
        .release_date(release_date)
        .mpaa_rating(mpaa_rating)
        .running_time(running_time)
        .genres(genres)
        .in_release(in_release)
        .widest_release(widest_release)
        .build())
}

fn money_summary(html: &Html) -> anyhow::Result<[RawMoney; 3]> {
    let mut money = html
        .select(selector!("div.mojo-performance-summary-table span.money"))
        .map(|span| RawMoney::from(span.text().collect::<String>().trim().to_owned()));
    let mut next = |name: &str| {
        money
            .next()
            .with_context(|| format!("{name} gross not found in performance summary"))
    };
    Ok([next("domestic")?, next("international")?, next("worldwide")?])
}

fn summary_slots(html: &Html) -> Vec<SummarySlot> {
    let Some(container) = html.select(selector!("div.mojo-summary-values")).next() else {
        return Vec::new();
    };
    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "div")
        .filter_map(SummarySlot::from_element)
        .collect()
}
