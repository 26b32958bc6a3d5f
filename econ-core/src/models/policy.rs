//! Government and trade interventions.
//!
//! A [`PolicySpec`] bundles every instrument a lesson can switch on. All of them
//! default to zero or disabled, and any subset may be active at once; the solver
//! applies them in a fixed order (shifts, equilibrium, trade and quota, anchors).

/// A per-unit amount levied on (or paid to) each side of the market
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct UnitWedge {
    /// Amount per unit bought
    pub demand_unit: f64,
    /// Amount per unit sold
    pub supply_unit: f64,
}

/// Per-unit duties on cross-border flows
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Tariff {
    /// Duty per imported unit
    pub import_unit: f64,
    /// Duty per exported unit
    pub export_unit: f64,
}

/// Instruments that move money between the market and the government
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Transfer {
    /// Taxes collected per unit
    pub tax: UnitWedge,
    /// Subsidies paid per unit
    pub subsidy: UnitWedge,
    /// Duties on trade, only relevant when a permit allows trade
    pub tariff: Tariff,
}

/// Quantity restrictions on trade
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Quota {
    /// The number of units licensed for import, `None` for no quota
    pub import_licensed_unit: Option<f64>,
}

/// Whether goods may cross the border at the world price
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Permit {
    /// Foreign sellers may supply the domestic market
    pub importing: bool,
    /// Domestic producers may sell abroad
    pub exporting: bool,
}

/// Legal limits on the domestic market price
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Anchor {
    /// The maximum legal price
    pub price_ceiling: Option<f64>,
    /// The minimum legal price
    pub price_floor: Option<f64>,
}

/// The complete set of interventions applied on top of the free market
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PolicySpec {
    /// Taxes, subsidies and tariffs
    pub transfer: Transfer,
    /// Import quota
    pub quota: Quota,
    /// Trade permits
    pub permit: Permit,
    /// Price ceiling and floor
    pub anchor: Anchor,
}

impl PolicySpec {
    /// Adds per-unit taxes on buyers and sellers
    pub fn with_tax(mut self, demand_unit: f64, supply_unit: f64) -> Self {
        self.transfer.tax = UnitWedge {
            demand_unit,
            supply_unit,
        };
        self
    }

    /// Adds per-unit subsidies to buyers and sellers
    pub fn with_subsidy(mut self, demand_unit: f64, supply_unit: f64) -> Self {
        self.transfer.subsidy = UnitWedge {
            demand_unit,
            supply_unit,
        };
        self
    }

    /// Adds per-unit duties on imports and exports
    pub fn with_tariff(mut self, import_unit: f64, export_unit: f64) -> Self {
        self.transfer.tariff = Tariff {
            import_unit,
            export_unit,
        };
        self
    }

    /// Caps the number of imported units
    pub fn with_quota(mut self, import_licensed_unit: f64) -> Self {
        self.quota.import_licensed_unit = Some(import_licensed_unit);
        self
    }

    /// Opens the border in either or both directions
    pub fn with_permit(mut self, importing: bool, exporting: bool) -> Self {
        self.permit = Permit {
            importing,
            exporting,
        };
        self
    }

    /// Sets a minimum legal price
    pub fn with_price_floor(mut self, price: f64) -> Self {
        self.anchor.price_floor = Some(price);
        self
    }

    /// Sets a maximum legal price
    pub fn with_price_ceiling(mut self, price: f64) -> Self {
        self.anchor.price_ceiling = Some(price);
        self
    }

    /// The net amount by which the buyers' curve moves down (taxes less subsidies)
    pub fn demand_wedge(&self) -> f64 {
        self.transfer.tax.demand_unit - self.transfer.subsidy.demand_unit
    }

    /// The net amount by which the sellers' curve moves up (taxes less subsidies)
    pub fn supply_wedge(&self) -> f64 {
        self.transfer.tax.supply_unit - self.transfer.subsidy.supply_unit
    }

    /// Whether any trade permit is granted
    pub fn is_open(&self) -> bool {
        self.permit.importing || self.permit.exporting
    }

    /// The same market with every government instrument removed.
    ///
    /// Trade permits are kept: the result is the undistorted benchmark that
    /// dead-weight loss is measured against.
    pub fn without_instruments(&self) -> Self {
        Self {
            permit: self.permit,
            ..Self::default()
        }
    }

    /// Every numeric field, paired with its name, for validation and logging
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 9] {
        [
            ("tax.demand_unit", Some(self.transfer.tax.demand_unit)),
            ("tax.supply_unit", Some(self.transfer.tax.supply_unit)),
            ("subsidy.demand_unit", Some(self.transfer.subsidy.demand_unit)),
            ("subsidy.supply_unit", Some(self.transfer.subsidy.supply_unit)),
            ("tariff.import_unit", Some(self.transfer.tariff.import_unit)),
            ("tariff.export_unit", Some(self.transfer.tariff.export_unit)),
            ("quota.import_licensed_unit", self.quota.import_licensed_unit),
            ("anchor.price_ceiling", self.anchor.price_ceiling),
            ("anchor.price_floor", self.anchor.price_floor),
        ]
    }
}
