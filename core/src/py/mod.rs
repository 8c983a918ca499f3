// Python-binding (feature "python"). Tynt lag: JSON inn, JSON ut.
use std::str::FromStr;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::config::TrackerConfig;
use crate::error::AcquisitionError;
use crate::models::{DistanceUnit, SpeedUnit};
use crate::tracker::SpeedTracker;

fn to_py_err<E: std::fmt::Display>(e: E) -> PyErr {
    PyErr::new::<PyValueError, _>(e.to_string())
}

#[pyclass(name = "SpeedTracker")]
pub struct PySpeedTracker {
    inner: SpeedTracker,
}

#[pymethods]
impl PySpeedTracker {
    #[new]
    #[pyo3(signature = (config_json = None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(txt) => TrackerConfig::from_json_str(txt).map_err(to_py_err)?,
            None => TrackerConfig::default(),
        };
        let inner = SpeedTracker::new(config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn is_tracking(&self) -> bool {
        self.inner.is_tracking()
    }

    fn set_speed_unit(&mut self, unit: &str) -> PyResult<()> {
        let unit = SpeedUnit::from_str(unit).map_err(to_py_err)?;
        self.inner.set_speed_unit(unit);
        Ok(())
    }

    fn set_distance_unit(&mut self, unit: &str) -> PyResult<()> {
        let unit = DistanceUnit::from_str(unit).map_err(to_py_err)?;
        self.inner.set_distance_unit(unit);
        Ok(())
    }

    /// Returnerer "accepted" | "ignored" | "skipped". Kaster aldri på dårlig fix.
    fn push_fix_json(&mut self, json_str: &str) -> String {
        self.inner.accept_json(json_str).label().to_string()
    }

    #[pyo3(signature = (code, message = ""))]
    fn report_error(&mut self, code: i32, message: &str) {
        self.inner.report_error(&AcquisitionError::from_code(code, message));
    }

    fn snapshot_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.snapshot()).map_err(to_py_err)
    }

    fn metrics_text(&self) -> PyResult<String> {
        self.inner.metrics().render().map_err(to_py_err)
    }
}

#[pyfunction]
#[pyo3(name = "haversine_km")]
fn py_haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    crate::geo::haversine_km(lat1, lon1, lat2, lon2)
}

#[pymodule]
fn speedtrack_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PySpeedTracker>()?;
    m.add_function(wrap_pyfunction!(py_haversine_km, m)?)?;
    Ok(())
}
