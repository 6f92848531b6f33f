use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Power-law fuel model
// ---------------------------------------------------------------------------

/// Fuel burn as power laws of the aircraft total mass, one term per flight
/// phase. Coefficients come from a regression over single-aisle and
/// wide-body missions (cruise fuel is per km, the others per flight).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelModel {
    pub cruise_a: f64,
    pub cruise_b: f64,
    pub cruise_c: f64,
    pub takeoff_landing_a: f64,
    pub takeoff_landing_b: f64,
    pub climb_descent_a: f64,
    pub climb_descent_b: f64,
    /// Holding speed for the reserve [km/h].
    pub holding_speed: f64,
    /// Holding time for the reserve [h].
    pub holding_time: f64,
}

impl Default for FuelModel {
    fn default() -> Self {
        Self {
            cruise_a: 0.000_058_583_031_974_781_4,
            cruise_b: 0.976_183_654_000_94,
            cruise_c: 0.783_563_064_133_963,
            takeoff_landing_a: 0.090_473_789_823_562_1,
            takeoff_landing_b: 0.850_276_475_663_708,
            climb_descent_a: 1.144_010_778_478_32,
            climb_descent_b: 0.537_401_800_486_297,
            holding_speed: 800.0,
            holding_time: 45.0 / 60.0,
        }
    }
}

/// Fuel mass per flight phase [kg].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelBreakdown {
    pub cruise: f64,
    pub takeoff_landing: f64,
    pub climb_descent: f64,
    pub reserve: f64,
}

impl FuelBreakdown {
    pub fn total(&self) -> f64 {
        self.cruise + self.takeoff_landing + self.climb_descent + self.reserve
    }
}

impl FuelModel {
    /// Cruise fuel burned per km at the given total mass [kg/km].
    pub fn cruise_per_km(&self, total_mass: f64) -> f64 {
        self.cruise_a * total_mass.powf(self.cruise_b) + self.cruise_c
    }

    /// Distance flown in the holding reserve [km].
    pub fn reserve_distance(&self) -> f64 {
        self.holding_speed * self.holding_time
    }

    /// Evaluate every phase at `total_mass` [kg] over `distance` [km].
    ///
    /// A zero distance has no cruise segment, so the reserve (sized on the
    /// cruise burn rate) is zero as well.
    pub fn breakdown(&self, total_mass: f64, distance: f64) -> FuelBreakdown {
        let cruise = self.cruise_per_km(total_mass) * distance;
        let reserve = if distance > 0.0 {
            self.reserve_distance() * (cruise / distance)
        } else {
            0.0
        };

        FuelBreakdown {
            cruise,
            takeoff_landing: self.takeoff_landing_a * total_mass.powf(self.takeoff_landing_b),
            climb_descent: self.climb_descent_a * total_mass.powf(self.climb_descent_b),
            reserve,
        }
    }

    /// Total fuel mass [kg] for one evaluation of the model.
    pub fn fuel_mass(&self, total_mass: f64, distance: f64) -> f64 {
        self.breakdown(total_mass, distance).total()
    }
}
