//! Render-engine selection.
//!
//! Engines are tried in a fixed preference order; each is checked by an
//! [`EngineProbe`] and the first one the probe accepts is used. With wgpu
//! the probe asks for a matching adapter, so "engine available" means the
//! machine can hand out that class of device.

use crate::error::{Result, SceneError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderEngineKind {
    /// Discrete GPU with multisampling
    HighPerformance,
    /// Any hardware adapter, preferring integrated/low-power parts
    LowPower,
    /// wgpu's software fallback adapter
    Software,
}

/// Preferred engine first, then the two fallbacks
pub const DEFAULT_ENGINE_ORDER: [RenderEngineKind; 3] = [
    RenderEngineKind::HighPerformance,
    RenderEngineKind::LowPower,
    RenderEngineKind::Software,
];

impl RenderEngineKind {
    /// MSAA sample count the engine renders with, given the requested count
    pub fn sample_count(self, requested: u32) -> u32 {
        match self {
            RenderEngineKind::HighPerformance if requested >= 4 => 4,
            _ => 1,
        }
    }

    fn power_preference(self) -> wgpu::PowerPreference {
        match self {
            RenderEngineKind::HighPerformance => wgpu::PowerPreference::HighPerformance,
            RenderEngineKind::LowPower | RenderEngineKind::Software => {
                wgpu::PowerPreference::LowPower
            }
        }
    }

    fn accepts(self, device_type: wgpu::DeviceType) -> bool {
        match self {
            RenderEngineKind::HighPerformance => device_type == wgpu::DeviceType::DiscreteGpu,
            RenderEngineKind::LowPower => device_type != wgpu::DeviceType::Cpu,
            RenderEngineKind::Software => true,
        }
    }
}

/// Capability check for one engine
pub trait EngineProbe {
    /// Whatever the caller needs to drive the engine once selected
    type Handle;

    fn probe(&self, engine: RenderEngineKind) -> Option<Self::Handle>;
}

/// Returns the first engine in `order` the probe accepts
pub fn select_engine<P: EngineProbe>(
    probe: &P,
    order: &[RenderEngineKind],
) -> Result<(RenderEngineKind, P::Handle)> {
    for &engine in order {
        match probe.probe(engine) {
            Some(handle) => {
                log::info!("Using render engine {engine:?}");
                return Ok((engine, handle));
            }
            None => log::warn!("Render engine {engine:?} unavailable, trying next"),
        }
    }
    Err(SceneError::NoRenderEngine {
        tried: order.to_vec(),
    })
}

/// Fixed availability flags, for headless decisions and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineAvailability {
    pub high_performance: bool,
    pub low_power: bool,
    pub software: bool,
}

impl EngineProbe for EngineAvailability {
    type Handle = ();

    fn probe(&self, engine: RenderEngineKind) -> Option<()> {
        let available = match engine {
            RenderEngineKind::HighPerformance => self.high_performance,
            RenderEngineKind::LowPower => self.low_power,
            RenderEngineKind::Software => self.software,
        };
        available.then_some(())
    }
}

/// Probes wgpu adapters, optionally requiring compatibility with a surface
pub struct AdapterProbe<'a> {
    pub instance: &'a wgpu::Instance,
    pub surface: Option<&'a wgpu::Surface<'a>>,
}

impl<'a> AdapterProbe<'a> {
    pub fn new(instance: &'a wgpu::Instance, surface: Option<&'a wgpu::Surface<'a>>) -> Self {
        Self { instance, surface }
    }
}

impl EngineProbe for AdapterProbe<'_> {
    type Handle = wgpu::Adapter;

    fn probe(&self, engine: RenderEngineKind) -> Option<wgpu::Adapter> {
        let adapter = pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: engine.power_preference(),
                compatible_surface: self.surface,
                force_fallback_adapter: engine == RenderEngineKind::Software,
            },
        ))
        .ok()?;

        let info = adapter.get_info();
        if engine.accepts(info.device_type) {
            log::debug!("{engine:?}: accepted adapter {} ({:?})", info.name, info.device_type);
            Some(adapter)
        } else {
            log::debug!("{engine:?}: rejected adapter {} ({:?})", info.name, info.device_type);
            None
        }
    }
}

/// Creates a wgpu instance over every available backend
pub fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// Requests the device and queue for a selected adapter
pub fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
    let device = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Tableau Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::Off,
    }))?;
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(high_performance: bool, low_power: bool, software: bool) -> EngineAvailability {
        EngineAvailability {
            high_performance,
            low_power,
            software,
        }
    }

    #[test]
    fn preferred_engine_wins_regardless_of_fallbacks() {
        for (lp, sw) in [(false, false), (true, false), (false, true), (true, true)] {
            let (engine, ()) = select_engine(&flags(true, lp, sw), &DEFAULT_ENGINE_ORDER).unwrap();
            assert_eq!(engine, RenderEngineKind::HighPerformance);
        }
    }

    #[test]
    fn falls_back_in_order() {
        let (engine, ()) = select_engine(&flags(false, true, true), &DEFAULT_ENGINE_ORDER).unwrap();
        assert_eq!(engine, RenderEngineKind::LowPower);

        let (engine, ()) = select_engine(&flags(false, false, true), &DEFAULT_ENGINE_ORDER).unwrap();
        assert_eq!(engine, RenderEngineKind::Software);
    }

    #[test]
    fn selection_is_idempotent() {
        let availability = flags(false, true, false);
        let first = select_engine(&availability, &DEFAULT_ENGINE_ORDER).unwrap().0;
        let second = select_engine(&availability, &DEFAULT_ENGINE_ORDER).unwrap().0;
        assert_eq!(first, second);
    }

    #[test]
    fn exhausted_list_is_an_error() {
        let err = select_engine(&flags(false, false, false), &DEFAULT_ENGINE_ORDER).unwrap_err();
        match err {
            SceneError::NoRenderEngine { tried } => assert_eq!(tried, DEFAULT_ENGINE_ORDER.to_vec()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_the_preferred_engine_multisamples() {
        assert_eq!(RenderEngineKind::HighPerformance.sample_count(4), 4);
        assert_eq!(RenderEngineKind::HighPerformance.sample_count(1), 1);
        assert_eq!(RenderEngineKind::LowPower.sample_count(4), 1);
        assert_eq!(RenderEngineKind::Software.sample_count(4), 1);
    }
}
