// Python Bindings
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::engine::config::{MatmulConfig, HIGH, SEED, SIZE};
use crate::engine::controller::MatmulController;
use crate::engine::error::EngineError;

fn to_py_err(e: EngineError) -> PyErr {
    match e {
        EngineError::NotSquare { .. }
        | EngineError::ShapeMismatch { .. }
        | EngineError::InvalidBound(_)
        | EngineError::Overflow { .. } => PyValueError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

#[pyclass(name = "MatmulController")]
pub struct PyMatmulController {
    inner: MatmulController,
    last_elapsed: Option<f64>,
}

#[pymethods]
impl PyMatmulController {
    #[new]
    #[pyo3(signature = (size = SIZE, seed = SEED, high = HIGH, threads = None))]
    fn new(size: usize, seed: u64, high: i64, threads: Option<usize>) -> Self {
        let config = MatmulConfig {
            size,
            seed,
            high,
            threads,
        };
        Self {
            inner: MatmulController::new(config),
            last_elapsed: None,
        }
    }

    /// Phase 1: Seed the input matrices
    fn initialize(&mut self) -> PyResult<()> {
        self.inner.initialize().map_err(to_py_err)?;
        Ok(())
    }

    /// Phase 2: Run the workers, returning the solution as an int64 array
    fn run<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<i64>>> {
        let inner = &mut self.inner;
        let report = py.allow_threads(|| inner.run()).map_err(to_py_err)?;
        self.last_elapsed = Some(report.elapsed.as_secs_f64());
        Ok(report.solution.into_pyarray(py))
    }

    /// Seconds spent in the worker region of the last run
    #[getter]
    fn elapsed(&self) -> Option<f64> {
        self.last_elapsed
    }
}

/// Multiplies two square int64 arrays with pulling workers
#[pyfunction]
#[pyo3(signature = (a, b, threads = None))]
fn multiply<'py>(
    py: Python<'py>,
    a: PyReadonlyArray2<'py, i64>,
    b: PyReadonlyArray2<'py, i64>,
    threads: Option<usize>,
) -> PyResult<Bound<'py, PyArray2<i64>>> {
    let a = a.as_array().to_owned();
    let b = b.as_array().to_owned();
    let report = py
        .allow_threads(|| MatmulController::with_inputs(a, b, threads)?.run())
        .map_err(to_py_err)?;
    Ok(report.solution.into_pyarray(py))
}

/// Python module definition
#[pymodule]
fn pullgrid(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMatmulController>()?;
    m.add_function(wrap_pyfunction!(multiply, m)?)?;
    Ok(())
}
