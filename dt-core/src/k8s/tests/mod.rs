mod kind_test;

use dt_testutils::*;
use serde_json::json;

use super::*;
