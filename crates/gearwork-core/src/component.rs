use crate::clutch::Clutch;
use crate::differential::Differential;
use crate::engine::Engine;
use crate::gearbox::Gearbox;
use crate::wheel::Wheel;
use serde::{Deserialize, Serialize};

/// Payload of a drivetrain node.
///
/// Every graph operation dispatches on this enum; adding a component type
/// means adding a variant and handling it in each operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Engine(Engine),
    Clutch(Clutch),
    Gearbox(Gearbox),
    Differential(Differential),
    Wheel(Wheel),
}

/// Discriminant of a [`Component`], for error messages and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Engine,
    Clutch,
    Gearbox,
    Differential,
    Wheel,
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Engine(_) => ComponentKind::Engine,
            Component::Clutch(_) => ComponentKind::Clutch,
            Component::Gearbox(_) => ComponentKind::Gearbox,
            Component::Differential(_) => ComponentKind::Differential,
            Component::Wheel(_) => ComponentKind::Wheel,
        }
    }
}

macro_rules! component_accessors {
    ($($variant:ident => $ty:ty, $as_ref:ident, $as_mut:ident;)*) => {
        impl Component {
            $(
                pub fn $as_ref(&self) -> Option<&$ty> {
                    match self {
                        Component::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        Component::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<$ty> for Component {
                fn from(inner: $ty) -> Self {
                    Component::$variant(inner)
                }
            }
        )*
    };
}

component_accessors! {
    Engine => Engine, as_engine, as_engine_mut;
    Clutch => Clutch, as_clutch, as_clutch_mut;
    Gearbox => Gearbox, as_gearbox, as_gearbox_mut;
    Differential => Differential, as_differential, as_differential_mut;
    Wheel => Wheel, as_wheel, as_wheel_mut;
}
