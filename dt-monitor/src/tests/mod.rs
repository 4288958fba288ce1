
use assertables::*;
use dt_testutils::*;
use tracing_test::traced_test;

use super::*;
