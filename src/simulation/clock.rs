//! Virtual simulation clock
//!
//! Converts elapsed real time into virtual simulation time through a fixed
//! speed multiplier, and keeps running totals of both.

#[derive(Debug, Clone)]
pub struct SimClock {
    speed_factor: f32,
    real_elapsed: f32,
    virtual_elapsed: f32,
}

impl SimClock {
    pub fn new(speed_factor: f32) -> Self {
        Self {
            speed_factor,
            real_elapsed: 0.0,
            virtual_elapsed: 0.0,
        }
    }

    /// Feed one real-time sample and return the virtual delta for this tick
    ///
    /// A negative sample is a caller bug: debug builds panic on it, release
    /// builds treat it as zero.
    pub fn advance(&mut self, real_dt: f32) -> f32 {
        debug_assert!(real_dt >= 0.0, "Cannot move clock backwards: {real_dt}s");
        let real_dt = real_dt.max(0.0);
        let virtual_dt = real_dt * self.speed_factor;
        self.real_elapsed += real_dt;
        self.virtual_elapsed += virtual_dt;
        virtual_dt
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    /// Real seconds fed in so far
    pub fn real_elapsed(&self) -> f32 {
        self.real_elapsed
    }

    /// Virtual seconds simulated so far
    pub fn virtual_elapsed(&self) -> f32 {
        self.virtual_elapsed
    }
}
