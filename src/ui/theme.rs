//! Intent-specific theme helpers for consistent styling across pages.

use crate::domain::ShipmentIntent;

// ============================================
// BUTTON STYLES
// ============================================

pub fn btn_primary(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "rounded-lg bg-sky-500 px-4 py-2 text-sm font-semibold text-white hover:bg-sky-400",
        ShipmentIntent::Quotation => "rounded-lg bg-emerald-500 px-4 py-2 text-sm font-semibold text-white hover:bg-emerald-400",
    }
}

pub fn btn_secondary(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "rounded-lg border border-slate-600 px-4 py-2 text-sm font-semibold text-slate-200 hover:border-sky-600 hover:bg-slate-800",
        ShipmentIntent::Quotation => "rounded-lg border border-slate-600 px-4 py-2 text-sm font-semibold text-slate-200 hover:border-emerald-600 hover:bg-slate-800",
    }
}

pub fn btn_small_active(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "rounded px-2 py-1 text-xs font-semibold bg-sky-500/20 text-sky-300 border border-sky-500/40",
        ShipmentIntent::Quotation => "rounded px-2 py-1 text-xs font-semibold bg-emerald-500/20 text-emerald-300 border border-emerald-500/40",
    }
}

pub fn btn_small_inactive(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "rounded px-2 py-1 text-xs text-slate-500 border border-slate-700 hover:border-sky-600 hover:text-sky-300",
        ShipmentIntent::Quotation => "rounded px-2 py-1 text-xs text-slate-500 border border-slate-700 hover:border-emerald-600 hover:text-emerald-300",
    }
}

pub const BTN_DANGER: &str = "rounded-lg border border-rose-500/40 px-4 py-2 text-sm font-semibold text-rose-200 hover:bg-rose-500/10";

// ============================================
// INPUT STYLES
// ============================================

pub fn input_class(intent: ShipmentIntent, invalid: bool) -> &'static str {
    match (intent, invalid) {
        (_, true) => "mt-1 w-full rounded-lg border border-rose-500/70 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-rose-400 focus:outline-none",
        (ShipmentIntent::Booking, false) => "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-sky-500 focus:outline-none",
        (ShipmentIntent::Quotation, false) => "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-emerald-500 focus:outline-none",
    }
}

pub const ERROR_TEXT: &str = "mt-1 text-xs text-rose-300";

// ============================================
// PANEL / CONTAINER STYLES
// ============================================

pub fn panel_border(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "rounded-xl border border-sky-800/50 bg-slate-900/40",
        ShipmentIntent::Quotation => "rounded-xl border border-emerald-800/50 bg-slate-900/40",
    }
}

pub const PANEL_SOLID: &str = "rounded-xl border border-slate-800 bg-slate-900/40";

// ============================================
// TABLE STYLES
// ============================================

pub fn table_container(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "rounded-xl border border-sky-900/40 bg-slate-900/40 overflow-hidden",
        ShipmentIntent::Quotation => "rounded-xl border border-emerald-900/40 bg-slate-900/40 overflow-hidden",
    }
}

pub fn table_header(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "border-b border-sky-900/40 bg-sky-950/30 text-xs uppercase text-sky-400/70",
        ShipmentIntent::Quotation => "border-b border-emerald-900/40 bg-emerald-950/30 text-xs uppercase text-emerald-400/70",
    }
}

pub fn table_divider(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "divide-y divide-sky-900/30",
        ShipmentIntent::Quotation => "divide-y divide-emerald-900/30",
    }
}

pub fn row_selected(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "bg-sky-500/10",
        ShipmentIntent::Quotation => "bg-emerald-500/10",
    }
}

// ============================================
// TEXT STYLES
// ============================================

pub fn text_primary(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "text-sky-300",
        ShipmentIntent::Quotation => "text-emerald-300",
    }
}

pub const TEXT_SECONDARY: &str = "text-slate-300";
pub const TEXT_MUTED: &str = "text-slate-500";
pub const LABEL: &str = "block text-xs font-semibold uppercase text-slate-500";

// ============================================
// ACCENT / HIGHLIGHT STYLES
// ============================================

pub fn accent_text(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "text-sky-400",
        ShipmentIntent::Quotation => "text-emerald-400",
    }
}

pub fn accent_fill(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "border-sky-400 bg-sky-500 text-white",
        ShipmentIntent::Quotation => "border-emerald-400 bg-emerald-500 text-white",
    }
}

pub fn link_class(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "text-xs font-semibold uppercase tracking-wide text-sky-300 hover:text-sky-100",
        ShipmentIntent::Quotation => "text-xs font-semibold uppercase tracking-wide text-emerald-300 hover:text-emerald-100",
    }
}

pub fn header_class(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => "border-b border-sky-900/40 bg-slate-950/90 backdrop-blur px-6 py-4",
        ShipmentIntent::Quotation => "border-b border-emerald-900/40 bg-slate-950/90 backdrop-blur px-6 py-4",
    }
}
