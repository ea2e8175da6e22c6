//! Enumerations shared by the integration tests.

#![allow(dead_code)]

use ordenum::Enumeration;

#[derive(Debug, Default, Enumeration)]
#[enumeration(serde)]
#[elements(MONDAY, TUESDAY, WEDNESDAY, THURSDAY, FRIDAY, SATURDAY, SUNDAY)]
pub struct WeekDay;

/// Universal gravitational constant, in m³ kg⁻¹ s⁻².
const G: f64 = 6.67300e-11;

#[derive(Debug, Enumeration)]
#[enumeration(args = (f64, f64))]
#[elements(
	MERCURY(3.303e+23, 2.4397e6),
	VENUS(4.869e+24, 6.0518e6),
	EARTH(5.976e+24, 6.37814e6),
	MARS(6.421e+23, 3.3972e6),
	JUPITER(1.9e+27, 7.1492e7),
	SATURN(5.688e+26, 6.0268e7),
	URANUS(8.686e+25, 2.5559e7),
	NEPTUNE(1.024e+26, 2.4746e7),
)]
pub struct Planet {
	mass: f64,
	radius: f64,
}

impl Planet {
	fn new(mass: f64, radius: f64) -> Self {
		Self { mass, radius }
	}

	pub fn mass(&self) -> f64 {
		self.mass
	}

	pub fn radius(&self) -> f64 {
		self.radius
	}

	pub fn surface_gravity(&self) -> f64 {
		G * self.mass / (self.radius * self.radius)
	}

	pub fn surface_weight(&self, other_mass: f64) -> f64 {
		other_mass * self.surface_gravity()
	}
}
