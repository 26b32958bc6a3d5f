mod curve;
mod map;
mod market;
mod point;
mod policy;
mod rate;
mod settings;

pub use curve::{
    Curve, CurveError, CurveKind, Direction, LinearCurve, LinearCurveDto, StepCurve, StepCurveDto,
};
pub use map::Map;
pub use market::{Allocation, MarketConfig, Participant};
pub use point::Point;
pub use policy::{Anchor, Permit, PolicySpec, Quota, Tariff, Transfer, UnitWedge};
pub use rate::{Param, RateOfChange};
pub use settings::Settings;
