use crate::controllers::progressive::data::render_request::RenderRequest;
use crate::core::data::zone::Zone;

/// Initial view parameters: the classic full-set framing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDefaults {
    pub zone: Zone,
    pub zoom: f64,
    pub depth: u32,
    pub target_cell_size: f64,
    pub nb_iteration: u32,
    pub threshold: f64,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            zone: Zone::new(-2.25, 1.25, -1.5, 1.5).expect("default zone is valid"),
            zoom: 250.0,
            depth: 4,
            target_cell_size: 4.0,
            nb_iteration: 200,
            threshold: 2.0,
        }
    }
}

impl RenderDefaults {
    #[must_use]
    pub fn build_request(&self, is_debugging: bool) -> RenderRequest {
        RenderRequest {
            zone: self.zone,
            zoom: self.zoom,
            depth: self.depth,
            target_cell_size: self.target_cell_size,
            nb_iteration: self.nb_iteration,
            threshold: self.threshold,
            is_debugging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_build_a_valid_request() {
        let request = RenderDefaults::default().build_request(false);

        assert!(request.validate().is_ok());
        assert_eq!(request.zoom, 250.0);
        assert_eq!(request.depth, 4);
        assert!(!request.is_debugging);
    }

    #[test]
    fn test_debug_flag_is_forwarded() {
        let request = RenderDefaults::default().build_request(true);

        assert!(request.is_debugging);
    }
}
