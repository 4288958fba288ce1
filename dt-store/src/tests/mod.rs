mod report_test;

use assertables::*;
use dt_core::prelude::*;
use dt_testutils::*;
use tracing_test::traced_test;

use super::*;
