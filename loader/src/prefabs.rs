//! Prefabricated bodies and solar systems.

pub mod bodies {
    use simulator::bodies::Body;

    // Radii are in pixels; they're only for drawing.

    /// Returns our Sun. This is the anchor.
    pub fn sun() -> Body {
        Body::new("Sun", 1.98892e30, 20.0, 0xFC9601).anchored()
    }

    /// Returns Mercury.
    /// Apparently Mercury's orbit is going to be a little off. But I'm no Einstein.
    pub fn mercury() -> Body {
        Body::new("Mercury", 3.30e23, 5.0, 0xADA8A5)
    }

    /// Returns Venus.
    pub fn venus() -> Body {
        Body::new("Venus", 4.8685e24, 9.0, 0xE39E1C)
    }

    /// Returns the Earth.
    pub fn earth() -> Body {
        Body::new("Earth", 5.9722e24, 10.0, 0x6B93D6)
    }

    /// Returns Mars.
    pub fn mars() -> Body {
        Body::new("Mars", 6.39e23, 5.0, 0xC1440E)
    }

    /// Returns Jupiter.
    pub fn jupiter() -> Body {
        Body::new("Jupiter", 1.898e27, 20.0, 0xD8CA9D)
    }

    /// Returns Saturn. Ringless, sorry.
    pub fn saturn() -> Body {
        Body::new("Saturn", 5.683e26, 18.0, 0xBFBDAF)
    }

    /// Returns Uranus.
    pub fn uranus() -> Body {
        Body::new("Uranus", 8.681e25, 14.0, 0xD1E7E7)
    }

    /// Returns Neptune.
    pub fn neptune() -> Body {
        Body::new("Neptune", 1.024e26, 12.0, 0x3F54BA)
    }
}

pub mod solar_systems {
    use crate::builder::{SolarSystemBuilder, SolarSystemBuilderEntry as SSBE};
    use crate::prefabs::bodies;
    use simulator::bodies::*;
    use simulator::AU;

    /// The Sun and the eight planets, all lined up on the -x axis and heading +y.
    pub fn ours() -> Vec<Orbiter> {
        let planet = |body: Body, au: f64, speed: f64| {
            SSBE::new_parts(body, Kinemat::planar(-au * AU, 0.0, 0.0, speed))
        };

        SolarSystemBuilder::new()
            .add(
                SSBE::new_parts(bodies::sun(), Kinemat::zero()).add_bulk(vec![
                    planet(bodies::mercury(), 0.387, 47.4e3),
                    planet(bodies::venus(), 0.723, 35.02e3),
                    planet(bodies::earth(), 1.0, 29.783e3),
                    planet(bodies::mars(), 1.524, 24.077e3),
                    planet(bodies::jupiter(), 5.204, 13.06e3),
                    planet(bodies::saturn(), 9.573, 9.68e3),
                    planet(bodies::uranus(), 19.165, 6.80e3),
                    planet(bodies::neptune(), 30.178, 5.43e3),
                ]),
            )
            .construct()
    }
}
